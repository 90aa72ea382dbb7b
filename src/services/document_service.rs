// src/services/document_service.rs

use std::path::PathBuf;

use chrono::Utc;
use genpdf::{elements, style, Element};
use image::Luma;
use qrcode::QrCode;

use crate::{
    common::error::AppError,
    db::LedgerRepository,
    models::{
        document::{HandoverCondition, HandoverDocument, HandoverPayload, HandoverSource},
        ledger::{validate_checklist, CHECKLIST_ITEMS},
    },
};

fn pdf_error(e: impl std::fmt::Display) -> AppError {
    AppError::InternalServerError(anyhow::Error::msg(e.to_string()))
}

/// Texto da declaração assinada pelo colaborador.
pub fn declaration_text(source: &HandoverSource) -> String {
    format!(
        "Eu, {}, inscrito(a) no CPF sob o nº {}, declaro ter recebido o aparelho {} {} \
         (número de série {}) nas condições descritas acima, comprometendo-me a zelar \
         pela sua guarda e conservação e a devolvê-lo quando solicitado. Estou ciente de \
         que, em caso de dano causado por dolo ou culpa, extravio ou não devolução, o valor \
         correspondente poderá ser descontado da minha remuneração, nos termos do \
         art. 462, § 1º, da CLT.",
        source.employee_name, source.employee_cpf, source.brand_name, source.model_name, source.serial_number,
    )
}

#[derive(Clone)]
pub struct DocumentService {
    ledger_repo: LedgerRepository,
    fonts_dir: PathBuf,
}

impl DocumentService {
    pub fn new(ledger_repo: LedgerRepository, fonts_dir: PathBuf) -> Self {
        Self { ledger_repo, fonts_dir }
    }

    /// Monta o termo de responsabilidade de uma entrega registrada no histórico.
    pub async fn build_handover(&self, entry_id: i64, payload: HandoverPayload) -> Result<HandoverDocument, AppError> {
        validate_checklist(&payload.checklist)?;

        self.ledger_repo
            .find_entry(entry_id)
            .await?
            .ok_or(AppError::MovementNotFound(entry_id))?;

        let source = self.ledger_repo.handover_source(entry_id).await?.ok_or_else(|| {
            AppError::InvalidInput(format!(
                "a movimentação {} não é uma entrega a colaborador",
                entry_id
            ))
        })?;

        Ok(HandoverDocument {
            protocol: entry_id,
            issued_on: Utc::now().date_naive(),
            declaration: declaration_text(&source),
            checklist: payload.checklist,
            source,
        })
    }

    pub async fn handover_pdf(&self, entry_id: i64, payload: HandoverPayload) -> Result<Vec<u8>, AppError> {
        let document = self.build_handover(entry_id, payload).await?;
        self.render_pdf(&document)
    }

    fn render_pdf(&self, document: &HandoverDocument) -> Result<Vec<u8>, AppError> {
        let font_family = genpdf::fonts::from_files(&self.fonts_dir, "Roboto", None).map_err(|_| {
            AppError::FontNotFound(format!("Fonte Roboto não encontrada em {}", self.fonts_dir.display()))
        })?;

        let source = &document.source;
        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("Termo de Responsabilidade #{}", document.protocol));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO ---
        doc.push(
            elements::Paragraph::new("TERMO DE RESPONSABILIDADE DE APARELHO CELULAR")
                .styled(style::Style::new().bold().with_font_size(16)),
        );
        doc.push(elements::Paragraph::new(format!(
            "Protocolo nº {}  |  Entrega em {}  |  Emitido em {}",
            document.protocol,
            source.moved_on.format("%d/%m/%Y"),
            document.issued_on.format("%d/%m/%Y"),
        )));
        doc.push(elements::Break::new(1.5));

        // --- COLABORADOR ---
        let bold = style::Style::new().bold();
        doc.push(elements::Paragraph::new("COLABORADOR").styled(bold));
        doc.push(elements::Paragraph::new(format!("Nome: {}", source.employee_name)));
        doc.push(elements::Paragraph::new(format!("CPF: {}", source.employee_cpf)));
        doc.push(elements::Paragraph::new(format!(
            "Setor: {}",
            source.employee_sector.as_deref().unwrap_or("-")
        )));
        if let Some(email) = &source.employee_email {
            doc.push(elements::Paragraph::new(format!("Gmail: {}", email)));
        }
        doc.push(elements::Break::new(1));

        // --- APARELHO ---
        doc.push(elements::Paragraph::new("APARELHO").styled(bold));
        doc.push(elements::Paragraph::new(format!("Modelo: {} {}", source.brand_name, source.model_name)));
        doc.push(elements::Paragraph::new(format!("Número de série: {}", source.serial_number)));
        doc.push(elements::Paragraph::new(format!(
            "IMEI 1: {}  |  IMEI 2: {}",
            source.imei1.as_deref().unwrap_or("-"),
            source.imei2.as_deref().unwrap_or("-"),
        )));
        doc.push(elements::Break::new(1.5));

        // --- CHECKLIST ---
        let mut table = elements::TableLayout::new(vec![3, 1, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));
        table
            .row()
            .element(elements::Paragraph::new("Item").styled(bold))
            .element(elements::Paragraph::new("Entregue").styled(bold))
            .element(elements::Paragraph::new("Estado").styled(bold))
            .push()
            .map_err(pdf_error)?;

        // Ordem fixa do formulário, não a ordem alfabética do mapa
        for item in CHECKLIST_ITEMS {
            let Some(entry) = document.checklist.get(item) else { continue };
            let condition: HandoverCondition = entry.condition;
            table
                .row()
                .element(elements::Paragraph::new(item))
                .element(elements::Paragraph::new(if entry.delivered { "Sim" } else { "Não" }))
                .element(elements::Paragraph::new(condition.label()))
                .push()
                .map_err(pdf_error)?;
        }
        doc.push(table);
        doc.push(elements::Break::new(1.5));

        // --- DECLARAÇÃO ---
        doc.push(elements::Paragraph::new(document.declaration.clone()).styled(style::Style::new().with_font_size(10)));
        doc.push(elements::Break::new(3));
        doc.push(elements::Paragraph::new("_______________________________________"));
        doc.push(elements::Paragraph::new(source.employee_name.clone()));
        doc.push(elements::Break::new(1.5));

        // --- QR CODE DO PROTOCOLO ---
        let code = QrCode::new(format!("ASSETFLOW-TERMO-{}", document.protocol).as_bytes()).map_err(pdf_error)?;
        let image_buffer = code.render::<Luma<u8>>().build();
        let dynamic_image = image::DynamicImage::ImageLuma8(image_buffer);
        let pdf_image = elements::Image::from_dynamic_image(dynamic_image)
            .map_err(pdf_error)?
            .with_scale(genpdf::Scale::new(0.4, 0.4));
        doc.push(pdf_image);

        let mut buffer = Vec::new();
        doc.render(&mut buffer).map_err(pdf_error)?;

        tracing::info!("📄 Termo de responsabilidade gerado para a movimentação {}", document.protocol);
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn source() -> HandoverSource {
        HandoverSource {
            entry_id: 31,
            moved_on: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            employee_name: "Maria Souza".into(),
            employee_cpf: "12345678901".into(),
            employee_sector: Some("Comercial".into()),
            employee_email: None,
            brand_name: "Samsung".into(),
            model_name: "Galaxy A54".into(),
            serial_number: "SN-0042".into(),
            imei1: None,
            imei2: None,
        }
    }

    #[test]
    fn declaration_names_employee_device_and_clt_article() {
        let text = declaration_text(&source());
        assert!(text.contains("Maria Souza"));
        assert!(text.contains("12345678901"));
        assert!(text.contains("Samsung Galaxy A54"));
        assert!(text.contains("SN-0042"));
        assert!(text.contains("art. 462"));
    }
}
