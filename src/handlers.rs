// src/handlers.rs

pub mod auth;
pub mod calculators;
pub mod campaigns;
pub mod checklist;
pub mod crews;
pub mod dashboard;
pub mod documents;
pub mod jobs;
pub mod leads;
pub mod leave;
pub mod materials;
pub mod portal;
pub mod quotes;
pub mod settings;
pub mod subcontractor;
pub mod tenancy;
pub mod website;
