/// Router Module Index
///
/// Organizes routing into access-segregated modules. Access control is applied at the
/// module level through route layers in `create_router`, and handlers additionally
/// declare the identity they need through their extractors.
///
/// Paths are absolute (`/api/...`), so a single path may be served by more than one
/// module with different methods, e.g. `GET /api/features` is public while
/// `POST /api/features` is admin-only.

/// Routes open to everyone. Identity, when supplied, only widens visibility.
pub mod public;

/// Routes that need a valid bearer token for a live account.
pub mod authenticated;

/// Routes restricted to the ADMIN role.
pub mod admin;
