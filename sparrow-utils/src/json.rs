use anyhow::{anyhow, Context, Result};
use flate2::{read::ZlibDecoder, write::ZlibEncoder, Compression};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::{
    fs,
    io::{Read, Write},
    path::Path,
};

/// Object keys sorted recursively so output is stable across runs.
pub fn jsonify<T: Serialize>(obj: &T) -> Result<String> {
    Ok(serde_json::to_string(&sort_keys(serde_json::to_value(obj)?))?)
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(obj) => {
            let mut entries: Vec<(String, Value)> = obj.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, sort_keys(v)))
                    .collect::<Map<String, Value>>(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Accepts an inline JSON string, a path to a JSON file, or `-` for stdin.
pub fn load_json_arg<T: DeserializeOwned>(arg: &str) -> Result<T> {
    let content = if arg == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read stdin")?;
        buffer
    } else if arg.trim_start().starts_with('{') || arg.trim_start().starts_with('[') {
        arg.to_string()
    } else {
        fs::read_to_string(arg).with_context(|| format!("Failed to read {}", arg))?
    };
    serde_json::from_str(&content).map_err(|e| anyhow!("Failed to parse json: {}", e))
}

pub fn load_hyperparameters(arg: Option<&str>) -> Result<Option<Map<String, Value>>> {
    arg.map(load_json_arg::<Map<String, Value>>).transpose()
}

pub fn compress_obj<T: Serialize>(obj: &T) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(jsonify(obj)?.as_bytes())?;
    Ok(encoder.finish()?)
}

pub fn decompress_obj<T: DeserializeOwned>(input: &[u8]) -> Result<T> {
    let mut decoder = ZlibDecoder::new(input);
    let mut decompressed = String::new();
    decoder.read_to_string(&mut decompressed)?;
    Ok(serde_json::from_str(&decompressed)?)
}

pub fn write_json<T: Serialize, P: AsRef<Path>>(path: P, obj: &T, compress: bool) -> Result<()> {
    let path = path.as_ref();
    let bytes = if compress {
        compress_obj(obj)?
    } else {
        jsonify(obj)?.into_bytes()
    };
    fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
}
