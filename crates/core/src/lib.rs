pub mod archive;
pub mod cache;
pub mod config;
pub mod decode;
pub mod jdk;
pub mod ledger;
pub mod logging;
pub mod resolver;

pub use cache::ResolutionCache;
pub use config::PoolConfig;
pub use decode::{BytecodeDecoder, ClassDecoder};
pub use ledger::ResourceLedger;
pub use resolver::{
    ArchiveResolver, ClassFilesResolver, CompositeResolver, PlatformPoolResolver, make_resolver,
};

pub use classpool_api::{ClassName, ResolutionResult, Resolver, ResolverError, Result};
