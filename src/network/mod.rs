pub mod rpc_client;

pub use rpc_client::{RpcClient, DEFAULT_RPC_URL, DEFAULT_TIMEOUT};
