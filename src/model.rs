/// Summary of a load operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    /// Variables written to the target environment.
    pub loaded: usize,
    /// Parsed keys dropped because the target already had a value for them.
    pub skipped_existing: usize,
    /// Files read to completion.
    pub files_read: usize,
}
