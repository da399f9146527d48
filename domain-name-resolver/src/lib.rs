mod resolve;

pub use resolve::{Resolution, ResolveError, Resolver, ResolverConfig, MAX_RESPONSE_SIZE};
