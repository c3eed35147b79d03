// src/services/document_service.rs

use chrono::Utc;
use genpdf::{elements, style, Alignment, Element};
use image::Luma;
use qrcode::QrCode;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ChecklistRepository, CrewRepository, JobRepository, SalesRepository, SettingsRepository},
    models::{
        checklist::build_checklist,
        documents::{self, Block, DocumentContent, DocumentData, DocumentKind, TestReadings},
    },
};

const FONT_FAMILY: &str = "Roboto";

/// A rendered PDF and the name to download it as.
pub struct RenderedDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct DocumentService {
    job_repo: JobRepository,
    sales_repo: SalesRepository,
    crew_repo: CrewRepository,
    checklist_repo: ChecklistRepository,
    settings_repo: SettingsRepository,
    fonts_dir: String,
    public_base_url: String,
}

impl DocumentService {
    pub fn new(
        job_repo: JobRepository,
        sales_repo: SalesRepository,
        crew_repo: CrewRepository,
        checklist_repo: ChecklistRepository,
        settings_repo: SettingsRepository,
        fonts_dir: String,
        public_base_url: String,
    ) -> Self {
        Self {
            job_repo,
            sales_repo,
            crew_repo,
            checklist_repo,
            settings_repo,
            fonts_dir,
            public_base_url,
        }
    }

    pub async fn generate(
        &self,
        tenant_id: Uuid,
        job_id: Uuid,
        kind: DocumentKind,
        readings: &TestReadings,
    ) -> Result<RenderedDocument, AppError> {
        let data = self.load(tenant_id, job_id, kind).await?;
        let file_name = kind.file_name(&data.job.job_number);
        let content = documents::build(kind, &data, readings);

        let fonts_dir = self.fonts_dir.clone();
        let bytes = tokio::task::spawn_blocking(move || render_pdf(&content, &fonts_dir))
            .await
            .map_err(|e| anyhow::anyhow!("PDF task failed: {}", e))??;

        tracing::info!(job_id = %job_id, document = kind.title(), size = bytes.len(), "Document generated");
        Ok(RenderedDocument { file_name, bytes })
    }

    async fn load(
        &self,
        tenant_id: Uuid,
        job_id: Uuid,
        kind: DocumentKind,
    ) -> Result<DocumentData, AppError> {
        let pool = self.job_repo.pool();

        let job = self
            .job_repo
            .find_job(pool, tenant_id, job_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Job".into()))?;
        let customer = self
            .sales_repo
            .find_lead(pool, tenant_id, job.lead_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Lead".into()))?;
        let company = self.settings_repo.get_settings(pool, tenant_id).await?;

        let installer = match (job.team_id, job.subcontractor_id) {
            (Some(team_id), _) => self
                .crew_repo
                .find_team(pool, tenant_id, team_id)
                .await?
                .map(|t| t.name),
            (None, Some(sub_id)) => self
                .crew_repo
                .find_subcontractor(pool, tenant_id, sub_id)
                .await?
                .map(|s| s.company_name),
            (None, None) => None,
        };

        let lead_electrician = match job.lead_electrician_id {
            Some(id) => self.crew_repo.find_electrician(pool, tenant_id, id).await?,
            None => None,
        };

        let checklist = if kind == DocumentKind::CommissioningReport {
            let saved = self.checklist_repo.list_entries(pool, tenant_id, job_id).await?;
            Some(build_checklist(job_id, &saved))
        } else {
            None
        };

        let portal_url = format!("{}/portal/{}", self.public_base_url, job.portal_token);

        Ok(DocumentData {
            job,
            customer,
            company,
            installer,
            lead_electrician,
            checklist,
            portal_url,
            generated_on: Utc::now().date_naive(),
        })
    }
}

fn render_err(e: impl std::fmt::Display) -> AppError {
    AppError::DocumentRender(e.to_string())
}

/// Lays the content out with genpdf. Fonts are loaded from `fonts_dir`.
pub fn render_pdf(content: &DocumentContent, fonts_dir: &str) -> Result<Vec<u8>, AppError> {
    let font_family = genpdf::fonts::from_files(fonts_dir, FONT_FAMILY, None)
        .map_err(|_| AppError::FontNotFound(format!("{} fonts missing in {}", FONT_FAMILY, fonts_dir)))?;

    let mut doc = genpdf::Document::new(font_family);
    doc.set_title(format!("{} - {}", content.title, content.subtitle));
    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(10);
    doc.set_page_decorator(decorator);

    let bold = style::Style::new().bold();

    doc.push(elements::Paragraph::new(content.company.as_str()).styled(bold.with_font_size(18)));
    doc.push(elements::Paragraph::new(content.title.as_str()).styled(bold.with_font_size(14)));
    doc.push(elements::Paragraph::new(content.subtitle.as_str()));
    doc.push(elements::Break::new(1.5));

    for section in &content.sections {
        doc.push(elements::Paragraph::new(section.heading.as_str()).styled(bold.with_font_size(12)));
        doc.push(elements::Break::new(0.5));

        match &section.block {
            Block::Fields(fields) => {
                let mut table = elements::TableLayout::new(vec![2, 3]);
                for (label, value) in fields {
                    table
                        .row()
                        .element(elements::Paragraph::new(label.as_str()).styled(bold))
                        .element(elements::Paragraph::new(value.as_str()))
                        .push()
                        .map_err(render_err)?;
                }
                doc.push(table);
            }
            Block::Table { widths, header, rows } => {
                let mut table = elements::TableLayout::new(widths.clone());
                table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

                let mut head = table.row();
                for h in header {
                    head.push_element(elements::Paragraph::new(h.as_str()).styled(bold));
                }
                head.push().map_err(render_err)?;

                for cells in rows {
                    let mut row = table.row();
                    for cell in cells {
                        row.push_element(elements::Paragraph::new(cell.as_str()));
                    }
                    row.push().map_err(render_err)?;
                }
                doc.push(table);
            }
            Block::Paragraphs(lines) => {
                for line in lines {
                    doc.push(elements::Paragraph::new(line.as_str()));
                    doc.push(elements::Break::new(0.3));
                }
            }
            Block::Signature(lines) => {
                doc.push(elements::Break::new(1));
                for line in lines {
                    doc.push(elements::Paragraph::new(line.as_str()));
                    doc.push(elements::Break::new(1));
                }
            }
        }
        doc.push(elements::Break::new(1));
    }

    if let Some(link) = &content.qr_link {
        let code = QrCode::new(link.as_bytes()).map_err(render_err)?;
        let image_buffer = code.render::<Luma<u8>>().build();
        let dynamic_image = image::DynamicImage::ImageLuma8(image_buffer);
        let qr = elements::Image::from_dynamic_image(dynamic_image)
            .map_err(render_err)?
            .with_scale(genpdf::Scale::new(0.5, 0.5));
        doc.push(qr);
        doc.push(elements::Paragraph::new(link.as_str()).styled(style::Style::new().with_font_size(8)));
    }

    for line in &content.footer {
        let mut footer = elements::Paragraph::new(line.as_str());
        footer.set_alignment(Alignment::Center);
        doc.push(footer.styled(style::Style::new().italic().with_font_size(8)));
    }

    let mut buffer = Vec::new();
    doc.render(&mut buffer).map_err(render_err)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::documents::fixtures;

    #[test]
    fn missing_fonts_are_reported_as_such() {
        let content = documents::build(
            DocumentKind::SingleLineDiagram,
            &fixtures::data(0.0),
            &TestReadings::default(),
        );
        let err = render_pdf(&content, "/nonexistent/fonts").unwrap_err();
        assert!(matches!(err, AppError::FontNotFound(_)));
    }
}
