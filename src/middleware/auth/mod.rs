/*
 * Responsibility
 * - identification / authentication / authorization stages
 * - the request context they hand to each other
 *
 * Order on a route is always identify → authenticate → authorize.
 */
mod authenticate;
mod authorize;
mod context;
mod identify;

pub use authenticate::{Authenticator, authenticate};
pub use authorize::{RoleGuard, authorize};
pub use context::{Identifier, RequestContext, authentication};
pub use identify::identify;
