//! Security wiring of the demo application.
//!
//! # Spring Security Equivalent
//! ```java
//! @Bean
//! public SecurityFilterChain securityFilterChain(HttpSecurity http) {
//!     return http
//!         .authorizeHttpRequests(auth -> auth
//!             .requestMatchers("/public/**", "/api/properties/**").permitAll()
//!             .anyRequest().authenticated())
//!         .authenticationProvider(tokenAuthenticationProvider)
//!         .exceptionHandling(e -> e.authenticationEntryPoint(new JsonAuthenticationEntryPoint()))
//!         .build();
//! }
//! ```

use actix_bootstrap_core::http::security::{
    AccessPolicy, AuditLogger, AuthenticationPipeline, InMemoryPrincipalStore, JsonFailureHandler,
    Principal, SecurityProperties, TokenAuthenticationProvider, TokenConfig,
};

/// Demo trust store. Each principal signs its tokens with its own secret.
///
/// - alice: ADMIN, USER + users:read, users:write
/// - bob: USER + users:read
pub fn demo_principals() -> InMemoryPrincipalStore {
    InMemoryPrincipalStore::new()
        .with_principal(
            Principal::new("alice", "alice-signing-secret-change-me")
                .roles(["ADMIN", "USER"])
                .authorities(["users:read", "users:write"]),
        )
        .with_principal(
            Principal::new("bob", "bob-signing-secret-change-me")
                .roles(["USER"])
                .authorities(["users:read"]),
        )
}

/// Builds the request pipeline from the `security.*` group.
pub fn pipeline(store: InMemoryPrincipalStore, security: &SecurityProperties) -> AuthenticationPipeline {
    let provider = TokenAuthenticationProvider::new(store)
        .with_config(TokenConfig::from_properties(&security.token));

    AuthenticationPipeline::new(provider)
        .access_policy(AccessPolicy::from_properties(security))
        .failure_handler(JsonFailureHandler::new())
        .audit_logger(AuditLogger::with_tracing())
}
