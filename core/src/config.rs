/// Options for a [`crate::Database`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Upper bound on the size of one streaming result slice. `None` keeps the engine's default.
    pub page_size_bytes: Option<u64>,
    pub read_only: bool,
}

impl DatabaseConfig {
    pub fn new() -> Self { Self::default() }

    pub fn page_size_bytes(mut self, bytes: u64) -> Self {
        self.page_size_bytes = Some(bytes);
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }
}
