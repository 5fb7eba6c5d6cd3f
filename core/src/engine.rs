/// Opaque identifier of one open engine instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EngineHandle(pub i64);

impl std::fmt::Display for EngineHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "engine#{}", self.0) }
}

/// The native side of the boundary.
///
/// Requests and responses are bincode-encoded `DbRequest` / `DbResponse`
/// messages; failures come back as an encoded `BackendError` envelope.
/// Implementations need not be reentrant: callers serialize access per handle.
pub trait Engine: Send + Sync {
    /// Initialize process-wide native state. Must be idempotent.
    fn load(&self) -> std::result::Result<(), String> { Ok(()) }

    fn open(&self) -> std::result::Result<EngineHandle, Vec<u8>>;

    fn run(&self, handle: EngineHandle, request: &[u8]) -> std::result::Result<Vec<u8>, Vec<u8>>;

    fn close(&self, handle: EngineHandle);
}
