//! Built-in fallback template.

use super::{SectionSpec, StyleGuide, Template};
use crate::document::DocumentType;

/// Id reported for documents built from the fallback template.
pub const DEFAULT_TEMPLATE_ID: &str = "default";

const OVERVIEW_BODY: &str = "This document is the {{document_type}} for {{title}}.\n\n\
{if tender_title}Tender: {{tender_title}}\n{endif}\
{if organization_name}Contracting authority: {{organization_name}}\n{endif}";

const BACKGROUND_BODY: &str = "{if tender_description}{{tender_description}}{endif}";

const PROPOSAL_BODY: &str =
    "{if content_requirements}This section addresses the stated requirements: {{content_requirements}}{endif}";

const SCHEDULE_BODY: &str =
    "{if submission_deadline}Submission deadline: {{submission_deadline}}{endif}";

const COST_BODY: &str =
    "{if estimated_value}Estimated value: {{estimated_value}} {{currency}}{endif}";

const CONCLUSION_BODY: &str = "This concludes the {{document_type}} for {{title}}.";

/// The template used when nothing loaded matches.
///
/// Seven sections; Background and Cost are optional.
pub fn default_template(document_type: DocumentType) -> Template {
    Template {
        id: DEFAULT_TEMPLATE_ID.to_string(),
        document_type,
        title: None,
        sections: vec![
            SectionSpec::new("Overview", true, "Summary of the document's main content and purpose")
                .with_body(OVERVIEW_BODY),
            SectionSpec::new("Background", false, "Project background and related information")
                .with_body(BACKGROUND_BODY),
            SectionSpec::new("Proposal Content", true, "Core proposal and its details")
                .with_body(PROPOSAL_BODY),
            SectionSpec::new("Technical Approach", true, "Technical approach and methodology"),
            SectionSpec::new(
                "Schedule & Deliverables",
                true,
                "Project schedule and key deliverables",
            )
            .with_body(SCHEDULE_BODY),
            SectionSpec::new("Cost", false, "Expected cost and budget summary")
                .with_body(COST_BODY),
            SectionSpec::new(
                "Conclusion",
                true,
                "Key strengths of the proposal and closing remarks",
            )
            .with_body(CONCLUSION_BODY),
        ],
        style_guide: StyleGuide::default(),
    }
}
