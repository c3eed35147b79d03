pub mod auth;
pub mod calculators;
pub mod campaign_service;
pub mod checklist_service;
pub mod document_service;
pub mod job_service;
pub mod leave_service;
pub mod material_service;
pub mod sales_service;
pub mod tenancy_service;

use uuid::Uuid;

/// Unguessable 64-hex token for public links (portal and subcontractor confirmation).
pub fn portal_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_64_hex_chars_and_distinct() {
        let a = portal_token();
        let b = portal_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
