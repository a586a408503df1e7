use crate::utils::error::Result;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Settings the parser needs, whatever their source (flags, TOML, defaults).
pub trait ConfigProvider: Send + Sync {
    fn manifest_entry(&self) -> &str;
    fn module_marker(&self) -> &str;
    fn descriptor_extensions(&self) -> &[String];
    fn concurrent_reads(&self) -> usize;
    fn accepted_extensions(&self) -> &[String];
    fn max_upload_bytes(&self) -> u64;
    fn score_seed(&self) -> Option<u64>;
    fn output_path(&self) -> Option<&str>;
}
