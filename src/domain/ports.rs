use crate::domain::model::StoredFile;
use crate::utils::error::Result;
use std::future::Future;

/// Upload area that hands out one writer per received file.
pub trait Storage: Send + Sync {
    type Writer: FileWriter;

    fn create_file(&self) -> impl Future<Output = Result<Self::Writer>> + Send;

    /// Deletes a file that was fully written but belongs to a rejected request.
    fn remove_file(&self, file: &StoredFile) -> impl Future<Output = Result<()>> + Send;
}

pub trait FileWriter: Send {
    fn write_chunk(&mut self, chunk: &[u8]) -> impl Future<Output = Result<()>> + Send;

    /// Flushes and reports what actually landed in storage. Nothing is left
    /// behind when this fails.
    fn finish(self) -> impl Future<Output = Result<StoredFile>> + Send;

    /// Drops a partially written file.
    fn discard(self) -> impl Future<Output = ()> + Send;
}
