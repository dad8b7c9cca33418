//! Typed `security.*` configuration group.

use serde::Deserialize;

/// Bound from the `security` prefix.
///
/// ```toml
/// [security]
/// permit-all = ["/public/**", "/api/properties/**"]
///
/// [security.token]
/// issuer = "bootstrap-demo"
/// leeway-secs = 30
/// ttl-secs = 3600
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SecurityProperties {
    /// Patterns that bypass authentication, in declaration order.
    pub permit_all: Vec<String>,
    pub token: TokenProperties,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TokenProperties {
    pub issuer: Option<String>,
    pub leeway_secs: u64,
    pub ttl_secs: u64,
}

impl Default for TokenProperties {
    fn default() -> Self {
        TokenProperties {
            issuer: None,
            leeway_secs: 0,
            ttl_secs: 3600,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ConfigurationContext;

    #[test]
    fn test_bind_security_group() {
        let context = ConfigurationContext::builder()
            .toml(
                r#"
                [security]
                permit-all = ["/public/**", "/health"]

                [security.token]
                issuer = "demo"
                leeway-secs = 5
                "#,
            )
            .build()
            .unwrap();

        let props: SecurityProperties = context.bind("security").unwrap();
        assert_eq!(props.permit_all, vec!["/public/**", "/health"]);
        assert_eq!(props.token.issuer.as_deref(), Some("demo"));
        assert_eq!(props.token.leeway_secs, 5);
        assert_eq!(props.token.ttl_secs, 3600);
    }

    #[test]
    fn test_env_overrides_token_settings() {
        let context = ConfigurationContext::builder()
            .toml("[security.token]\nttl-secs = 3600\nleeway-secs = 5")
            .env("APP__SECURITY__TOKEN__TTL_SECS", "60")
            .env("APP__SECURITY__TOKEN__LEEWAY_SECS", "0")
            .build()
            .unwrap();

        let props: SecurityProperties = context.bind("security").unwrap();
        assert_eq!(props.token.ttl_secs, 60);
        assert_eq!(props.token.leeway_secs, 0);
    }

    #[test]
    fn test_missing_group_uses_defaults() {
        let context = ConfigurationContext::empty();
        let props: SecurityProperties = context.bind_or_default("security").unwrap();
        assert!(props.permit_all.is_empty());
        assert_eq!(props.token, TokenProperties::default());
    }
}
