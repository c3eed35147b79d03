pub mod auth;
pub mod calculators;
pub mod campaigns;
pub mod checklist;
pub mod crews;
pub mod dashboard;
pub mod documents;
pub mod jobs;
pub mod leave;
pub mod materials;
pub mod sales;
pub mod settings;
pub mod tenancy;
pub mod website;
