mod registry;
mod token;

pub use registry::parse_tenant_tokens;
pub use token::Token;
