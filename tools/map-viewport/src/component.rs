use crate::bindings;
use crate::config::ViewportConfig;
use crate::tool::{call, tool_specs};

use bindings::exports::wasmcp::protocol::tools::Guest;
use bindings::wasi::io::streams::OutputStream;
use bindings::wasmcp::protocol::mcp::*;

struct MapViewport;

impl Guest for MapViewport {
    fn list_tools(
        _ctx: bindings::wasmcp::protocol::server_messages::Context,
        _request: ListToolsRequest,
        _client_stream: Option<&OutputStream>,
    ) -> Result<ListToolsResult, ErrorCode> {
        Ok(ListToolsResult {
            tools: tool_specs()
                .into_iter()
                .map(|spec| Tool {
                    name: spec.name.to_string(),
                    input_schema: spec.input_schema.to_string(),
                    options: Some(ToolOptions {
                        meta: None,
                        annotations: None,
                        description: Some(spec.description.to_string()),
                        output_schema: None,
                        title: Some(spec.title.to_string()),
                    }),
                })
                .collect(),
            next_cursor: None,
            meta: None,
        })
    }

    fn call_tool(
        _ctx: bindings::wasmcp::protocol::server_messages::Context,
        request: CallToolRequest,
        _client_stream: Option<&OutputStream>,
    ) -> Option<CallToolResult> {
        let config = ViewportConfig::from_env();
        call(&request.name, &request.arguments, &config).map(|outcome| match outcome {
            Ok(text) => success_result(text),
            Err(msg) => error_result(msg),
        })
    }
}

fn success_result(result: String) -> CallToolResult {
    CallToolResult {
        content: vec![ContentBlock::Text(TextContent {
            text: TextData::Text(result),
            options: None,
        })],
        is_error: None,
        meta: None,
        structured_content: None,
    }
}

fn error_result(message: String) -> CallToolResult {
    CallToolResult {
        content: vec![ContentBlock::Text(TextContent {
            text: TextData::Text(message),
            options: None,
        })],
        is_error: Some(true),
        meta: None,
        structured_content: None,
    }
}

bindings::export!(MapViewport with_types_in bindings);
