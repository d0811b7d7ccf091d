// handlers/mod.rs - 3-Tier Handler Architecture
//
// Public (no auth) → Protected (any valid session) → Elevated (admin session)
pub mod elevated; // Tier 3: admin role required (/api/admin/*)
pub mod protected; // Tier 2: authenticated session required (/api/*)
pub mod public; // Tier 1: no authentication required (/auth/*)
