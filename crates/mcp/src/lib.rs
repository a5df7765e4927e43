// MCP (Model Context Protocol) surface of fxgate: JSON-RPC types, the tool
// registry, the five rate tools, and the transport-independent dispatcher.

pub mod protocol;
pub mod server;
pub mod tools;

pub use server::McpServer;
