//! The assembly flow for one request

use openapi_schema::{
    parse_selection, parse_template, Endpoint, EndpointCatalog, HttpMethod, ParameterLocation,
    SchemaDocument, TemplateRenderer, ValueSynthesizer,
};
use serde_json::Value;
use tracing::{debug, info};

use super::body::{non_empty_body, BodyMode};
use super::command::CommandLine;
use crate::collector::{solicit_text, solicit_verbatim, Collector};
use crate::context::SessionContext;
use crate::error::{ExplorerError, Result};
use crate::prompt::{FieldOrigin, FieldPrompt, Notice, Prompter};
use crate::settings::EnvironmentSettings;
use crate::tools::{Editor, IdPicker, Selector, Toolbox};

/// Result of a run
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The rendered command line
    Command(String),
    /// The operator did not pick an endpoint
    Cancelled,
}

/// The environment a request is assembled for
#[derive(Debug, Clone, Copy)]
pub struct RequestTarget<'a> {
    pub environment: &'a str,
    pub settings: &'a EnvironmentSettings,
    pub curl_command: &'a str,
}

/// Walks the operator through one request, strictly in order: endpoint,
/// configured headers, declared headers, path, query, body.
pub struct RequestAssembler<'a> {
    document: &'a SchemaDocument,
    target: RequestTarget<'a>,
    selector: &'a dyn Selector,
    picker: &'a dyn IdPicker,
    editor: &'a dyn Editor,
    body_mode: BodyMode,
}

impl<'a> RequestAssembler<'a> {
    pub fn new(document: &'a SchemaDocument, target: RequestTarget<'a>, tools: &'a Toolbox) -> Self {
        Self::with_tools(
            document,
            target,
            tools.selector.as_ref(),
            tools.id_picker.as_ref(),
            tools.editor.as_ref(),
        )
    }

    pub fn with_tools(
        document: &'a SchemaDocument,
        target: RequestTarget<'a>,
        selector: &'a dyn Selector,
        picker: &'a dyn IdPicker,
        editor: &'a dyn Editor,
    ) -> Self {
        Self {
            document,
            target,
            selector,
            picker,
            editor,
            body_mode: BodyMode::default(),
        }
    }

    pub fn body_mode(mut self, body_mode: BodyMode) -> Self {
        self.body_mode = body_mode;
        self
    }

    /// Run the whole flow. Declining the endpoint selection is
    /// `Outcome::Cancelled`, not an error.
    pub fn run(&self, prompter: &mut dyn Prompter) -> Result<Outcome> {
        let catalog = EndpointCatalog::new(self.document);

        let Some((method, path)) = self.select_endpoint(&catalog)? else {
            info!("No endpoint selected");
            return Ok(Outcome::Cancelled);
        };
        info!("Selected {} {}", method, path);

        let mut context = SessionContext::new();
        let headers = self.collect_headers(&catalog, method, &path, &mut context, prompter)?;
        let resolved_path = self.collect_path(&catalog, method, &path, &context, prompter)?;
        let query = self.collect_query(&catalog, method, &path, &context, prompter)?;

        let body = match catalog.request_body_schema(&path, method) {
            Some(schema) if method.accepts_body() => {
                self.collect_body(schema, method, &path, &context, prompter)?
            }
            _ => None,
        };

        let command = CommandLine {
            program: self.target.curl_command.to_string(),
            environment: self.target.environment.to_string(),
            url: format!("{}{}{}", self.base_url(), resolved_path, query),
            method,
            headers,
            body,
        };

        Ok(Outcome::Command(command.render()))
    }

    /// Offer every endpoint to the selector
    fn select_endpoint(&self, catalog: &EndpointCatalog<'_>) -> Result<Option<(HttpMethod, String)>> {
        let endpoints = catalog.endpoints();
        if endpoints.is_empty() {
            return Err(ExplorerError::NoEndpoints);
        }
        debug!("Offering {} endpoints", endpoints.len());

        let lines: Vec<String> = endpoints.iter().map(Endpoint::format_line).collect();
        let Some(selected) = self.selector.select("Select API endpoint", &lines)? else {
            return Ok(None);
        };

        parse_selection(&selected)
            .map(Some)
            .ok_or(ExplorerError::InvalidSelection(selected))
    }

    /// Configured headers first, then declared header parameters that the
    /// configured set does not already cover.
    fn collect_headers(
        &self,
        catalog: &EndpointCatalog<'_>,
        method: HttpMethod,
        path: &str,
        context: &mut SessionContext,
        prompter: &mut dyn Prompter,
    ) -> Result<Vec<(String, String)>> {
        let mut headers = Vec::new();
        let configured = &self.target.settings.required_headers;

        if !configured.is_empty() {
            prompter.section("Required Headers");
            for header in configured {
                let prompt = FieldPrompt::new(&header.name, FieldOrigin::Header)
                    .required(true)
                    .type_label("string")
                    .description(header.description.as_deref());

                if let Some(value) = solicit_text(prompter, self.picker, context, &prompt)? {
                    self.capture_scope(&header.name, &value, context, prompter);
                    headers.push((header.name.clone(), value));
                }
            }
        }

        let declared: Vec<_> = catalog
            .parameters(path, method, ParameterLocation::Header)
            .into_iter()
            .filter(|param| {
                !configured
                    .iter()
                    .any(|header| header.name.eq_ignore_ascii_case(&param.name))
            })
            .collect();

        if !declared.is_empty() {
            prompter.section("Header Parameters");
            for param in &declared {
                let prompt = FieldPrompt::new(&param.name, FieldOrigin::Header)
                    .required(param.required)
                    .type_label(param.schema_type.as_str())
                    .description(param.description.as_deref());

                if let Some(value) = solicit_text(prompter, self.picker, context, &prompt)? {
                    self.capture_scope(&param.name, &value, context, prompter);
                    headers.push((param.name.clone(), value));
                }
            }
        }

        Ok(headers)
    }

    fn capture_scope(
        &self,
        header: &str,
        value: &str,
        context: &mut SessionContext,
        prompter: &mut dyn Prompter,
    ) {
        if self.target.settings.is_scope_header(header) && context.capture_client_scope(value) {
            prompter.notify(Notice::Info, "(will be used for identifier lookup filtering)");
        }
    }

    /// Fill `{name}` placeholders with the collected text
    fn collect_path(
        &self,
        catalog: &EndpointCatalog<'_>,
        method: HttpMethod,
        path: &str,
        context: &SessionContext,
        prompter: &mut dyn Prompter,
    ) -> Result<String> {
        let params = catalog.parameters(path, method, ParameterLocation::Path);
        let mut current = path.to_string();
        if params.is_empty() {
            return Ok(current);
        }

        prompter.section("Path Parameters");
        prompter.notify(Notice::Info, &format!("Building: {}{}", self.base_url(), path));

        for param in &params {
            let prompt = FieldPrompt::new(&param.name, FieldOrigin::Path)
                .required(param.required)
                .type_label(param.schema_type.as_str())
                .description(param.description.as_deref());

            let value = solicit_verbatim(prompter, self.picker, context, &prompt)?;
            if value.is_empty() {
                prompter.notify(
                    Notice::Warning,
                    &format!("No value for {{{}}}, substituting an empty segment", param.name),
                );
            }
            current = substitute_path(&current, &param.name, &value);
        }

        Ok(current)
    }

    /// `?name=value&...` for every query parameter given a value
    fn collect_query(
        &self,
        catalog: &EndpointCatalog<'_>,
        method: HttpMethod,
        path: &str,
        context: &SessionContext,
        prompter: &mut dyn Prompter,
    ) -> Result<String> {
        let params = catalog.parameters(path, method, ParameterLocation::Query);
        prompter.section("Query Parameters");
        if params.is_empty() {
            prompter.notify(Notice::Info, "No query parameters defined in schema.");
            return Ok(String::new());
        }

        let mut parts = Vec::new();
        for param in &params {
            let prompt = FieldPrompt::new(&param.name, FieldOrigin::Query)
                .required(param.required)
                .type_label(param.schema_type.as_str())
                .description(param.description.as_deref());

            if let Some(value) = solicit_text(prompter, self.picker, context, &prompt)? {
                parts.push(format!("{}={}", param.name, value));
            }
        }

        if parts.is_empty() {
            Ok(String::new())
        } else {
            Ok(format!("?{}", parts.join("&")))
        }
    }

    fn collect_body(
        &self,
        schema: &Value,
        method: HttpMethod,
        path: &str,
        context: &SessionContext,
        prompter: &mut dyn Prompter,
    ) -> Result<Option<Value>> {
        prompter.section("Request Body");
        debug!("Collecting body in {} mode", self.body_mode);

        let body = match self.body_mode {
            BodyMode::Interactive => {
                Collector::new(self.document, self.selector, self.picker, context)
                    .collect(schema, prompter)?
            }
            BodyMode::Template => {
                let label = format!("{} {}", method, path);
                let template = TemplateRenderer::new(self.document).render(schema, Some(&label));
                let edited = self.editor.edit(&template)?;
                let body = parse_template(&edited)
                    .map_err(|e| ExplorerError::InvalidBody(e.to_string()))?;
                prompter.notify(Notice::Success, "Body read from template");
                body
            }
            BodyMode::Example => Some(ValueSynthesizer::new(self.document).example(schema)),
        };

        Ok(non_empty_body(body))
    }

    fn base_url(&self) -> &str {
        self.target.settings.base_url.trim_end_matches('/')
    }
}

/// Replace every `{name}` in `path` with `value`, verbatim
pub fn substitute_path(path: &str, name: &str, value: &str) -> String {
    path.replace(&format!("{{{}}}", name), value)
}
