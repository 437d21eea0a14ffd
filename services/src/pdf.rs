//! Printable summary of a submission, attached next to the client's uploads.

use db::models::submission::{NewSubmission, SubmissionDetails};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use serde_json::Value;
use thiserror::Error;

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN_X: f32 = 40.0;
const MARGIN_Y: f32 = 60.0;
/// Rough Helvetica advance as a fraction of the font size, for wrapping.
const AVG_GLYPH_WIDTH: f32 = 0.5;
const NOT_PROVIDED: &str = "Not provided";

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF rendering failed: {0}")]
    Render(#[from] lopdf::Error),

    #[error("PDF encoding failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Style {
    Title,
    Subtitle,
    Section,
    Heading,
    Body,
}

impl Style {
    fn font(self) -> &'static str {
        match self {
            Style::Body => "F1",
            _ => "F2",
        }
    }

    fn size(self) -> f32 {
        match self {
            Style::Title => 20.0,
            Style::Subtitle | Style::Section => 14.0,
            Style::Heading => 11.0,
            Style::Body => 10.0,
        }
    }

    fn space_before(self) -> f32 {
        match self {
            Style::Section => 12.0,
            Style::Heading => 4.0,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone)]
struct Line {
    style: Style,
    text: String,
}

/// Text layout of one submission, ready to be rendered.
#[derive(Debug, Clone, Default)]
pub struct SubmissionPdf {
    lines: Vec<Line>,
}

impl SubmissionPdf {
    pub fn from_submission(submission: &NewSubmission) -> Self {
        let d = &submission.details;
        let mut pdf = SubmissionPdf::default();

        pdf.push(Style::Title, "CODE REQUEST SUBMISSION");
        pdf.push(Style::Subtitle, format!("Reference ID: {}", submission.id));
        pdf.push(Style::Body, format!("Submitted on: {}", submission.submitted_at));
        pdf.push(Style::Body, format!("Plan: {}", submission.plan_type));
        if let Some(price) = submission.price {
            pdf.push(Style::Body, format!("Price: {price:.2}"));
        }

        pdf.section("Personal Details");
        pdf.field("Full Name", Some(submission.full_name.as_str()));
        pdf.field("Email", Some(submission.email.as_str()));
        pdf.field("Title", d.title.as_deref());

        pdf.section("Projects");
        pdf.entries(
            d.projects.as_ref(),
            "No projects provided",
            |i, p| format!("Project {}: {}", i + 1, text_or(p, "title", "Untitled")),
            &[("Description", "description"), ("Technologies", "technologies"), ("Link", "link")],
        );

        pdf.section("Experience");
        pdf.entries(
            d.experience.as_ref(),
            "No experience provided",
            |_, e| {
                format!(
                    "{} - {}",
                    text_or(e, "company", "Unknown Company"),
                    text_or(e, "position", "Position not specified")
                )
            },
            &[("Duration", "duration"), ("Description", "description")],
        );

        pdf.section("Education");
        pdf.entries(
            d.education.as_ref(),
            "No education provided",
            |_, e| {
                format!(
                    "{} - {}",
                    text_or(e, "institution", "Unknown Institution"),
                    text_or(e, "degree", "Degree not specified")
                )
            },
            &[("Year", "year"), ("Description", "description")],
        );

        pdf.section("Professional Profile");
        pdf.field("Job Profile", d.job_profile.as_deref());
        pdf.field("GitHub Profile", d.github_profile.as_deref());
        pdf.field("Skills", d.skills.as_deref());

        pdf.section("Design Preferences");
        pdf.field("Design Preferences", d.design_preferences.as_deref());
        pdf.field("Color Scheme", d.color_scheme.as_deref());
        pdf.field("Font Family", d.font_family.as_deref());
        pdf.field("Layout Style", d.layout_style.as_deref());

        pdf.section("Website Features");
        pdf.features(d);

        pdf.section("Additional Details");
        pdf.field("Responsive Preference", d.responsive_preference.as_deref());
        pdf.field("Language Preference", d.language_preference.as_deref());
        pdf.field("Target Audience", d.target_audience.as_deref());
        pdf.field("Project Timeline", d.project_timeline.as_deref());
        pdf.field("Social Media Links", d.social_media_links.as_deref());
        pdf.field("Additional Requests", d.additional_requests.as_deref());

        pdf
    }

    fn push(&mut self, style: Style, text: impl Into<String>) {
        self.lines.push(Line {
            style,
            text: text.into(),
        });
    }

    fn section(&mut self, title: &str) {
        self.push(Style::Section, title);
    }

    fn field(&mut self, label: &str, value: Option<&str>) {
        let value = value.filter(|v| !v.trim().is_empty()).unwrap_or(NOT_PROVIDED);
        self.push(Style::Body, format!("{label}: {value}"));
    }

    fn features(&mut self, d: &SubmissionDetails) {
        let yes_no = |flag: Option<bool>| if flag.unwrap_or(false) { "Yes" } else { "No" };
        self.push(Style::Body, format!("- SEO Optimization: {}", yes_no(d.seo_optimization)));
        self.push(Style::Body, format!("- Contact Form: {}", yes_no(d.contact_form_needed)));
        self.push(Style::Body, format!("- Blog Section: {}", yes_no(d.blog_section)));
        self.push(Style::Body, format!("- Portfolio Gallery: {}", yes_no(d.portfolio_gallery)));
    }

    /// One heading plus labelled fields per array element. Anything that is
    /// not a non-empty JSON array renders as `empty`.
    fn entries(
        &mut self,
        value: Option<&Value>,
        empty: &str,
        heading: impl Fn(usize, &Value) -> String,
        fields: &[(&str, &str)],
    ) {
        let items = match value {
            Some(Value::Array(items)) if !items.is_empty() => items,
            _ => {
                self.push(Style::Body, empty);
                return;
            }
        };

        for (i, item) in items.iter().enumerate() {
            self.push(Style::Heading, heading(i, item));
            for (label, key) in fields {
                self.push(Style::Body, format!("{label}: {}", text_or(item, key, NOT_PROVIDED)));
            }
        }
    }

    /// Render to PDF bytes: Helvetica, A4, with a `n of m` page footer.
    pub fn render(&self) -> Result<Vec<u8>, PdfError> {
        let pages = self.paginate();
        let page_count = pages.len();

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let regular = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular,
                "F2" => bold,
            },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(page_count);
        for (index, placed) in pages.iter().enumerate() {
            let mut operations = Vec::new();
            for (y, line) in placed {
                text_op(&mut operations, line.style.font(), line.style.size(), MARGIN_X, *y, &line.text);
            }
            let footer = format!("{} of {}", index + 1, page_count);
            let footer_x = PAGE_WIDTH / 2.0 - text_width(&footer, 9.0) / 2.0;
            text_op(&mut operations, "F1", 9.0, footer_x, MARGIN_Y / 2.0, &footer);

            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        Ok(bytes)
    }

    /// Wrap every line to the printable width and assign baselines, starting a
    /// new page whenever the bottom margin is reached.
    fn paginate(&self) -> Vec<Vec<(f32, Line)>> {
        let printable = PAGE_WIDTH - 2.0 * MARGIN_X;
        let top = PAGE_HEIGHT - MARGIN_Y;
        let mut pages: Vec<Vec<(f32, Line)>> = vec![Vec::new()];
        let mut y = top;

        for line in &self.lines {
            let size = line.style.size();
            let leading = size * 1.4;
            let max_chars = ((printable / (size * AVG_GLYPH_WIDTH)) as usize).max(1);
            let on_fresh_page = y >= top;
            if !on_fresh_page {
                y -= line.style.space_before();
            }

            for chunk in wrap(&line.text, max_chars) {
                if y - leading < MARGIN_Y {
                    pages.push(Vec::new());
                    y = top;
                }
                y -= leading;
                if let Some(page) = pages.last_mut() {
                    page.push((
                        y,
                        Line {
                            style: line.style,
                            text: chunk,
                        },
                    ));
                }
            }
        }

        pages
    }

    #[cfg(test)]
    fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.text.as_str()).collect()
    }
}

fn text_op(ops: &mut Vec<Operation>, font: &str, size: f32, x: f32, y: f32, text: &str) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("Tf", vec![font.into(), size.into()]));
    ops.push(Operation::new("Td", vec![x.into(), y.into()]));
    ops.push(Operation::new("Tj", vec![Object::string_literal(to_win_ansi(text))]));
    ops.push(Operation::new("ET", vec![]));
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * AVG_GLYPH_WIDTH
}

/// Standard fonts only cover Latin-1; everything else becomes `?`.
fn to_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7e | 0xa0..=0xff => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

/// Greedy word wrap on whitespace; words longer than `max` are split.
fn wrap(text: &str, max: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for raw in text.lines() {
        let mut current = String::new();
        for word in raw.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let rest = word.split_off(max);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            let word: String = word.into_iter().collect();
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > max && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn text_or<'a>(item: &'a Value, key: &str, fallback: &'a str) -> &'a str {
    item.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use db::models::submission::{PlanType, SubmissionStatus};
    use serde_json::json;

    fn submission(details: SubmissionDetails) -> NewSubmission {
        NewSubmission {
            id: "sub-7".into(),
            plan_type: PlanType::Live,
            full_name: "Grace Hopper".into(),
            email: "grace@example.com".into(),
            submitted_at: "2025-10-19".into(),
            status: SubmissionStatus::Pending,
            price: None,
            details,
            resume: None,
            uploaded_files: vec![],
            pdf: None,
            payment_id: None,
            payment_date: None,
            payer_name: None,
        }
    }

    #[test]
    fn layout_lists_projects_and_placeholders() {
        let pdf = SubmissionPdf::from_submission(&submission(SubmissionDetails {
            projects: Some(json!([{ "title": "Compiler", "link": "https://x.dev" }])),
            experience: Some(json!("not json")),
            seo_optimization: Some(true),
            ..Default::default()
        }));
        let texts = pdf.texts();

        assert!(texts.contains(&"Reference ID: sub-7"));
        assert!(texts.contains(&"Project 1: Compiler"));
        assert!(texts.contains(&"Technologies: Not provided"));
        assert!(texts.contains(&"Link: https://x.dev"));
        assert!(texts.contains(&"No experience provided"));
        assert!(texts.contains(&"No education provided"));
        assert!(texts.contains(&"- SEO Optimization: Yes"));
        assert!(texts.contains(&"- Blog Section: No"));
    }

    #[test]
    fn renders_loadable_pdf() {
        let bytes = SubmissionPdf::from_submission(&submission(SubmissionDetails::default()))
            .render()
            .unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn long_content_spills_onto_more_pages() {
        let projects: Vec<Value> = (0..40)
            .map(|i| json!({ "title": format!("P{i}"), "description": "word ".repeat(60) }))
            .collect();
        let bytes = SubmissionPdf::from_submission(&submission(SubmissionDetails {
            projects: Some(Value::Array(projects)),
            ..Default::default()
        }))
        .render()
        .unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        assert!(doc.get_pages().len() > 1);
    }

    #[test]
    fn wrap_respects_width() {
        assert_eq!(wrap("aa bb cc", 5), vec!["aa bb", "cc"]);
        assert_eq!(wrap("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert_eq!(wrap("", 10), vec![String::new()]);
    }

    #[test]
    fn non_latin_text_is_replaced() {
        assert_eq!(to_win_ansi("café ✓"), b"caf\xe9 ?".to_vec());
    }
}
