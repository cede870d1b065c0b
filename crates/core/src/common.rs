//! Shared attribute definitions emitted once per project.

use tera::Context;

use crate::config::DEFAULT_ROOT_NAMESPACE;
use crate::emitter::GeneratedSource;
use crate::error::GenerateError;

const COMMON_ATTRIBUTES: &str = include_str!("../templates/common_attributes.cs");

/// File name of the shared attribute definitions.
pub const COMMON_HINT_NAME: &str = "Common.g.cs";

/// Render `Common.g.cs` into `namespace`, falling back to the default root namespace.
pub fn common_attributes(namespace: &str) -> Result<GeneratedSource, GenerateError> {
    let namespace = match namespace.trim() {
        "" => DEFAULT_ROOT_NAMESPACE,
        ns => ns,
    };

    let mut context = Context::new();
    context.insert("ns", namespace);
    let text = tera::Tera::one_off(COMMON_ATTRIBUTES, &context, false)?;

    Ok(GeneratedSource {
        hint_name: COMMON_HINT_NAME.to_string(),
        text,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_common_attributes_namespace() {
        let source = common_attributes("Acme.Clients").unwrap();
        assert_eq!(source.hint_name, "Common.g.cs");
        assert!(source.text.contains("namespace Acme.Clients\n"));
        assert!(!source.text.contains("{{ns}}"));
    }

    #[test]
    fn test_common_attributes_declare_recognized_names() {
        let text = common_attributes("").unwrap().text;
        assert!(text.contains("namespace ApiClient.Generated\n"));
        for name in [
            "ApiClientGeneratorAttribute",
            "GetAttribute",
            "PostAttribute",
            "PutAttribute",
            "DeleteAttribute",
            "BodyAttribute",
            "HeaderAttribute",
            "AliasAsAttribute",
            "FmtAttribute",
            "ThrowsExceptionsAttribute",
            "SerializationAttribute",
            "ConnectionTooLongWarnAttribute",
        ] {
            assert!(text.contains(&format!("class {name} ")), "missing {name}");
        }
        assert!(text.contains("public enum Serialization"));
    }
}
