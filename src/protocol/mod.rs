mod request;
mod response;

pub use request::{
    ClientInfo, InitializeParams, JsonRpcRequest, PromptGetParams, ResourceReadParams, RpcId,
    ToolCallParams,
};
pub use response::{
    ErrorKind, JsonRpcError, JsonRpcResponse, ToolResult, ToolResultContent, WireError,
};
