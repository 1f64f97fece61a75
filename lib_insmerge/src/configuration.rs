use crate::DEFAULT_GAP_CHARACTER;

/// Selects how merged sequences are emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// One CSV row per sequence and one column per residue or inserted residue.
    #[default]
    Matrix,
    /// Only the insertion at point zero is merged and emitted as head,
    /// while the residues following it in the pre-alignment sequence are emitted separately as tail.
    Trimmed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConfiguration {
    pub mode: OutputMode,
    pub gap_character: char,
}

impl MergeConfiguration {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            gap_character: DEFAULT_GAP_CHARACTER,
        }
    }

    pub fn is_trimmed(&self) -> bool {
        self.mode == OutputMode::Trimmed
    }
}

impl Default for MergeConfiguration {
    fn default() -> Self {
        Self::new(OutputMode::default())
    }
}
