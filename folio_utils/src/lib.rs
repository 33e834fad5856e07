#[macro_use]
mod macros;

/// Version string reported by the CLI and sent in the relay user agent.
pub const fn folio_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Name and version, as used in the `User-Agent` header.
pub fn user_agent() -> String {
    format!("folio/{}", folio_version())
}
