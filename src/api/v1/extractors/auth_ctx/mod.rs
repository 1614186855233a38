/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - Hand the authenticated context (AuthCtx) to handlers
 * - axum-facing code lives in core, the type itself in types
 *
 * Public API:
 * - AuthCtx
 * - AuthCtxExtractor
 */

mod core;
mod types;

pub use self::core::AuthCtxExtractor;
pub use types::AuthCtx;
