use crate::metadata::PackageMetadata;
use crate::name::PackageName;

/// A package registry that can be administered.
///
/// Calls are awaited one at a time by every caller in this crate; implementors
/// do not need to tolerate concurrent use of a single handle.
#[async_trait::async_trait]
pub trait Registry: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Every package name the registry knows about.
    async fn all_packages(&self) -> Result<Vec<PackageName>, Self::Error>;

    /// The metadata document for one package.
    async fn package_metadata(&self, name: &PackageName) -> Result<PackageMetadata, Self::Error>;

    /// Remove one package. Resolves once the registry acknowledged the deletion.
    async fn delete_package(&self, name: &PackageName) -> Result<(), Self::Error>;
}
