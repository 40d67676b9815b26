//! Manifest parsing: the primary `SKILL.md` form and the four alternate
//! manifest adapters, all converging on the same [`Manifest`] shape.

use std::path::Path;

use acidtest_core::{AcidError, Manifest, Result};

/// Splits a `SKILL.md` into its YAML-like frontmatter and markdown body,
/// parses the frontmatter, and returns the resulting manifest plus body.
pub fn parse_skill_md(text: &str) -> Result<(Manifest, String)> {
    let (frontmatter, body) = split_frontmatter(text)?;
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(&frontmatter).map_err(|e| AcidError::input("SKILL.md", format!("invalid frontmatter: {e}")))?;
    Ok((manifest_from_yaml(&yaml), body))
}

fn split_frontmatter(text: &str) -> Result<(String, String)> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let rest = text.strip_prefix("---").ok_or_else(|| AcidError::input("SKILL.md", "missing frontmatter delimiter"))?;
    let rest = rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n')).unwrap_or(rest);
    let end = rest.find("\n---").ok_or_else(|| AcidError::input("SKILL.md", "unterminated frontmatter"))?;
    let frontmatter = rest[..end].to_string();
    let after = &rest[end + 4..];
    let body = after.strip_prefix("\r\n").or_else(|| after.strip_prefix('\n')).unwrap_or(after);
    Ok((frontmatter, body.to_string()))
}

fn manifest_from_yaml(yaml: &serde_yaml::Value) -> Manifest {
    let mapping = yaml.as_mapping().cloned().unwrap_or_default();
    let get_str = |key: &str| -> Option<String> {
        mapping.get(&serde_yaml::Value::String(key.into())).and_then(|v| v.as_str()).map(String::from)
    };
    let get_seq = |key: &str| -> Vec<String> {
        mapping
            .get(&serde_yaml::Value::String(key.into()))
            .and_then(|v| v.as_sequence())
            .map(|seq| seq.iter().filter_map(|item| item.as_str().map(String::from)).collect())
            .unwrap_or_default()
    };
    let raw = serde_json::to_value(yaml)
        .ok()
        .and_then(|v| v.as_object().cloned())
        .map(|obj| obj.into_iter().collect())
        .unwrap_or_default();

    Manifest {
        name: get_str("name"),
        description: get_str("description"),
        version: get_str("version"),
        env: get_seq("env"),
        bins: get_seq("bins"),
        capabilities: get_seq("capabilities"),
        raw,
    }
}

const ALTERNATE_FILENAMES: &[&str] = &["mcp.json", "server.json", "package.json", "claude_desktop_config.json"];

/// Tries each alternate manifest form in turn, returning the first one
/// present and recognized. `package.json` only counts when it carries an
/// `mcp`/`mcpServers` key; the others are recognized unconditionally.
pub fn try_alternate(root: &Path) -> Result<Option<Manifest>> {
    for filename in ALTERNATE_FILENAMES {
        let path = root.join(filename);
        if !path.is_file() {
            continue;
        }
        let text = std::fs::read_to_string(&path).map_err(|e| AcidError::input(root, format!("cannot read {filename}: {e}")))?;
        let value: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| AcidError::input(root, format!("{filename} is not valid JSON: {e}")))?;
        let servers = extract_servers(&value);
        if servers.is_empty() {
            continue;
        }
        return Ok(Some(manifest_from_mcp_value(&value, &servers)));
    }
    Ok(None)
}

fn extract_servers(value: &serde_json::Value) -> Vec<(String, serde_json::Value)> {
    for key in ["mcpServers", "mcp"] {
        if let Some(obj) = value.get(key).and_then(|v| v.as_object()) {
            return obj.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        }
    }
    Vec::new()
}

fn manifest_from_mcp_value(value: &serde_json::Value, servers: &[(String, serde_json::Value)]) -> Manifest {
    let mut env = Vec::new();
    let mut bins = Vec::new();
    let mut tools = Vec::new();

    for (name, cfg) in servers {
        tools.push(name.clone());
        if let Some(cmd) = cfg.get("command").and_then(|v| v.as_str()) {
            bins.push(cmd.to_string());
        }
        if let Some(args) = cfg.get("args").and_then(|v| v.as_array()) {
            bins.extend(args.iter().filter_map(|a| a.as_str()).map(String::from));
        }
        if let Some(envmap) = cfg.get("env").and_then(|v| v.as_object()) {
            env.extend(envmap.keys().cloned());
        }
    }

    let name = value.get("name").and_then(|v| v.as_str()).map(String::from);
    let description = value.get("description").and_then(|v| v.as_str()).map(String::from);
    let version = value.get("version").and_then(|v| v.as_str()).map(String::from);
    let raw = value.as_object().cloned().map(|obj| obj.into_iter().collect()).unwrap_or_default();

    Manifest { name, description, version, env, bins, capabilities: tools, raw }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_basic_skill_md_frontmatter() {
        let text = "---\nname: demo\ndescription: a demo skill\nenv:\n  - API_KEY\nbins:\n  - curl\ncapabilities:\n  - network\n---\n# Demo\nBody text.\n";
        let (manifest, body) = parse_skill_md(text).unwrap();
        assert_eq!(manifest.name.as_deref(), Some("demo"));
        assert_eq!(manifest.env, vec!["API_KEY"]);
        assert_eq!(manifest.bins, vec!["curl"]);
        assert_eq!(manifest.capabilities, vec!["network"]);
        assert!(body.contains("Body text."));
    }

    #[test]
    fn missing_delimiter_is_input_error() {
        let err = parse_skill_md("# Just markdown, no frontmatter\n").unwrap_err();
        assert!(matches!(err, AcidError::Input { .. }));
    }

    #[test]
    fn mcp_servers_key_yields_tools_bins_and_env() {
        let value: serde_json::Value = serde_json::from_str(
            r#"{"mcpServers": {"weather": {"command": "node", "args": ["server.js"], "env": {"API_KEY": "x"}}}}"#,
        )
        .unwrap();
        let servers = extract_servers(&value);
        let manifest = manifest_from_mcp_value(&value, &servers);
        assert_eq!(manifest.capabilities, vec!["weather"]);
        assert!(manifest.bins.contains(&"node".to_string()));
        assert!(manifest.bins.contains(&"server.js".to_string()));
        assert_eq!(manifest.env, vec!["API_KEY"]);
    }

    #[test]
    fn package_json_without_mcp_key_is_not_recognized() {
        let value: serde_json::Value = serde_json::from_str(r#"{"name": "some-lib", "version": "1.0.0"}"#).unwrap();
        assert!(extract_servers(&value).is_empty());
    }
}
