//! The slice of the `Runtime` domain other domains refer to.

use serde::{Deserialize, Serialize};
use serde_json::Value;

string_id!(
    /// Unique script identifier.
    ScriptId
);

string_id!(
    /// Unique object identifier.
    RemoteObjectId
);

integer_id!(
    /// Id of an execution context.
    ExecutionContextId
);

string_enum!(
    /// Object type.
    RemoteObjectType {
        Object => "object",
        Function => "function",
        Undefined => "undefined",
        String => "string",
        Number => "number",
        Boolean => "boolean",
        Symbol => "symbol",
        Bigint => "bigint",
        Wasm => "wasm",
    }
);

string_enum!(
    /// Object subtype hint. Specified for `object` or `wasm` type values only.
    RemoteObjectSubtype {
        Array => "array",
        Null => "null",
        Node => "node",
        Regexp => "regexp",
        Date => "date",
        Map => "map",
        Set => "set",
        Weakmap => "weakmap",
        Weakset => "weakset",
        Iterator => "iterator",
        Generator => "generator",
        Error => "error",
        Proxy => "proxy",
        Promise => "promise",
        Typedarray => "typedarray",
        Arraybuffer => "arraybuffer",
        Dataview => "dataview",
        Webassemblymemory => "webassemblymemory",
        Wasmvalue => "wasmvalue",
        Trustedtype => "trustedtype",
    }
);

/// Mirror object referencing an original JavaScript object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteObject {
    #[serde(rename = "type")]
    pub r#type: RemoteObjectType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<RemoteObjectSubtype>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    /// Remote object value for primitives and JSON-serializable objects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Primitive value which cannot be JSON-stringified (`NaN`, `-0`, bigints...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unserializable_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<RemoteObjectId>,
}

impl RemoteObject {
    pub fn new(r#type: RemoteObjectType) -> Self {
        Self {
            r#type,
            subtype: None,
            class_name: None,
            value: None,
            unserializable_value: None,
            description: None,
            object_id: None,
        }
    }
}

/// Stack entry for runtime errors and assertions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallFrame {
    pub function_name: String,
    pub script_id: ScriptId,
    pub url: String,
    /// 0-based.
    pub line_number: i64,
    /// 0-based.
    pub column_number: i64,
}
