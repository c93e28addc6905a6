use anyhow::{Context, Result};
use handlebars::Handlebars;
use serde::Serialize;

use crate::preview::{PreviewDocument, PREVIEW_TARGET_ID};

const TEMPLATE_NAME: &str = "preview";

/// Sections are externally tagged, so each `#if` below matches exactly one
/// section kind. Handlebars escapes every `{{value}}`.
const PREVIEW_TEMPLATE: &str = r#"<div id="{{target_id}}" class="resume-paper">
  <header class="resume-header">
    <h1 class="resume-name">{{doc.header.name}}</h1>
    {{#if doc.header.title}}<p class="resume-title">{{doc.header.title}}</p>{{/if}}
    {{#if doc.header.email}}<p class="resume-contact">{{doc.header.email}}</p>{{/if}}
  </header>
  {{#each doc.sections}}
  {{#if profile_overview}}
  <section class="resume-section">
    <h2 class="resume-section-title">Profile Overview</h2>
    <p class="resume-text">{{profile_overview}}</p>
  </section>
  {{/if}}
  {{#if key_highlights}}
  <section class="resume-section">
    <h2 class="resume-section-title">Key Highlights</h2>
    <ul>{{#each key_highlights}}<li class="resume-bullet">{{this}}</li>{{/each}}</ul>
  </section>
  {{/if}}
  {{#if professional_experience}}
  <section class="resume-section">
    <h2 class="resume-section-title">Professional Experience</h2>
    {{#each professional_experience}}
    <div class="resume-entry">
      <div class="resume-entry-heading">
        <span class="resume-entry-title">{{job_title}}</span>{{#if company}}<span class="resume-entry-company"> &mdash; {{company}}</span>{{/if}}
        {{#if duration}}<span class="resume-entry-duration">{{duration}}</span>{{/if}}
      </div>
      {{#if responsibilities}}<ul>{{#each responsibilities}}<li class="resume-bullet">{{this}}</li>{{/each}}</ul>{{/if}}
    </div>
    {{/each}}
  </section>
  {{/if}}
  {{#if technical_skills}}
  <section class="resume-section">
    <h2 class="resume-section-title">Technical Skills</h2>
    {{#each technical_skills}}<p class="resume-text"><strong>{{category}}:</strong> {{skills}}</p>{{/each}}
  </section>
  {{/if}}
  {{#if project_experience}}
  <section class="resume-section">
    <h2 class="resume-section-title">Project Experience</h2>
    {{#each project_experience}}
    <div class="resume-entry">
      <p class="resume-entry-title">{{title}}</p>
      {{#if description}}<p class="resume-text">{{description}}</p>{{/if}}
    </div>
    {{/each}}
  </section>
  {{/if}}
  {{/each}}
</div>
"#;

#[derive(Serialize)]
struct TemplateContext<'a> {
    target_id: &'static str,
    doc: &'a PreviewDocument,
}

/// Renders a [`PreviewDocument`] into the HTML fragment shown in the preview pane.
pub struct PreviewRenderer {
    registry: Handlebars<'static>,
}

impl PreviewRenderer {
    pub fn new() -> Result<Self> {
        let mut registry = Handlebars::new();
        registry
            .register_template_string(TEMPLATE_NAME, PREVIEW_TEMPLATE)
            .context("Preview template failed to compile")?;
        Ok(Self { registry })
    }

    pub fn render(&self, doc: &PreviewDocument) -> Result<String> {
        let ctx = TemplateContext {
            target_id: PREVIEW_TARGET_ID,
            doc,
        };
        self.registry
            .render(TEMPLATE_NAME, &ctx)
            .context("Preview template failed to render")
    }
}
