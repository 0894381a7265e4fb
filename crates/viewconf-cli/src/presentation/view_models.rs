use serde::Serialize;
use std::fmt;
use viewconf_engine::ArchElement;
use viewconf_runtime::{ImportSummary, ViewResult};
use viewconf_types::{
    Customization, CustomizationId, Line, LineId, LineKind, OptionalMode, ViewType,
};

// --------------------------------------------------------
// Catalog
// --------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ImportViewModel {
    pub source: String,
    #[serde(flatten)]
    pub summary: ImportSummary,
}

impl fmt::Display for ImportViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Imported {} models ({} fields, {} buttons, {} views) from {}",
            self.summary.models,
            self.summary.fields,
            self.summary.buttons,
            self.summary.views,
            self.source
        )
    }
}

#[derive(Debug, Serialize)]
pub struct ModelSummary {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub fields: usize,
    pub buttons: usize,
    pub views: usize,
}

#[derive(Debug, Serialize)]
pub struct ModelListViewModel {
    pub models: Vec<ModelSummary>,
}

impl fmt::Display for ModelListViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.models.is_empty() {
            writeln!(f, "No models in the catalog. Run 'viewconf catalog import <file>'.")?;
            return Ok(());
        }

        writeln!(
            f,
            "{:<6} {:<30} {:<8} {:<8} VIEWS",
            "ID", "MODEL", "FIELDS", "BUTTONS"
        )?;
        for model in &self.models {
            writeln!(
                f,
                "{:<6} {:<30} {:<8} {:<8} {}",
                model.id, model.name, model.fields, model.buttons, model.views
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct ViewSummary {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub view_type: ViewType,
    pub priority: i32,
}

#[derive(Debug, Serialize)]
pub struct ViewListViewModel {
    pub model: String,
    pub views: Vec<ViewSummary>,
}

impl fmt::Display for ViewListViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.views.is_empty() {
            writeln!(f, "Model {} stores no views.", self.model)?;
            return Ok(());
        }

        writeln!(f, "{:<6} {:<10} {:<9} NAME", "ID", "TYPE", "PRIORITY")?;
        for view in &self.views {
            writeln!(
                f,
                "{:<6} {:<10} {:<9} {}",
                view.id, view.view_type, view.priority, view.name
            )?;
        }
        Ok(())
    }
}

// --------------------------------------------------------
// Customizations
// --------------------------------------------------------

/// Outcome of a command that yields one customization id.
#[derive(Debug, Serialize)]
pub struct CustomizationRef {
    pub id: CustomizationId,
    pub model: String,
    #[serde(skip)]
    pub action: &'static str,
}

impl fmt::Display for CustomizationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} customization {} of {}", self.action, self.id, self.model)
    }
}

#[derive(Debug, Serialize)]
pub struct CustomizationListViewModel {
    pub customizations: Vec<Customization>,
}

impl fmt::Display for CustomizationListViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.customizations.is_empty() {
            writeln!(f, "No customizations.")?;
            return Ok(());
        }

        writeln!(f, "{:<6} {:<30} {:<8} {:<8} UPDATED", "ID", "MODEL", "VIEW", "USER")?;
        for customization in &self.customizations {
            writeln!(
                f,
                "{:<6} {:<30} {:<8} {:<8} {}",
                customization.id,
                customization.model_name,
                display_or(customization.view, "-"),
                display_or(customization.user, "all"),
                customization.updated_at
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct CustomizationDetailViewModel {
    pub customization: Customization,
    pub lines: Vec<Line>,
    /// Resources of the default view not yet materialized.
    pub pending: Vec<String>,
    pub arch: String,
}

impl fmt::Display for CustomizationDetailViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.customization;
        writeln!(f, "Customization {} of {}", c.id, c.model_name)?;
        writeln!(f, "  Base view: {}", display_or(c.view, "(default tree)"))?;
        writeln!(f, "  User:      {}", display_or(c.user, "(all users)"))?;
        writeln!(f)?;

        writeln!(f, "{}", LineTable(&self.lines))?;

        if !self.pending.is_empty() {
            writeln!(f, "Pending from the default view: {}", self.pending.join(", "))?;
            writeln!(f)?;
        }

        writeln!(f, "{}", self.arch)
    }
}

#[derive(Debug, Serialize)]
pub struct CountViewModel {
    pub count: usize,
    #[serde(skip)]
    pub message: &'static str,
}

impl fmt::Display for CountViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.message, self.count)
    }
}

// --------------------------------------------------------
// Lines
// --------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct LinesCreatedViewModel {
    pub ids: Vec<LineId>,
}

impl fmt::Display for LinesCreatedViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<String> = self.ids.iter().map(ToString::to_string).collect();
        writeln!(f, "Created line {}", ids.join(", "))
    }
}

struct LineTable<'a>(&'a [Line]);

impl fmt::Display for LineTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "No lines.");
        }

        writeln!(
            f,
            "{:<6} {:<8} {:<24} {:<5} {:<7} {:<9} {:<11} SUM",
            "ID", "KIND", "NAME", "SEQ", "EXPAND", "OPTIONAL", "SEARCHABLE"
        )?;
        for line in self.0 {
            let kind = match line.kind() {
                LineKind::Field => "field",
                LineKind::Button => "button",
            };
            let optional = match line.options.optional {
                OptionalMode::Unset => "-",
                OptionalMode::Show => "show",
                OptionalMode::Hide => "hide",
            };
            writeln!(
                f,
                "{:<6} {:<8} {:<24} {:<5} {:<7} {:<9} {:<11} {}",
                display_or(line.id, "-"),
                kind,
                line.name(),
                display_or(line.options.sequence, "-"),
                display_or(line.options.expand, "-"),
                optional,
                yes_no(line.options.searchable),
                yes_no(line.options.sum)
            )?;
        }
        Ok(())
    }
}

// --------------------------------------------------------
// Views
// --------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ViewViewModel {
    #[serde(flatten)]
    pub result: ViewResult,
    #[serde(skip)]
    pub columns: Vec<ArchElement>,
}

impl fmt::Display for ViewViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = &self.result;
        writeln!(
            f,
            "{} {} view ({})",
            r.model,
            r.view_type,
            display_or(r.view_id.map(|id| format!("view {}", id)), "synthesized")
        )?;
        for column in &self.columns {
            let attributes: Vec<String> = column
                .attributes
                .iter()
                .filter(|(key, _)| key != "name")
                .map(|(key, value)| format!("{}={}", key, value))
                .collect();
            writeln!(
                f,
                "  {:<8} {:<24} {}",
                column.tag,
                column.name.as_deref().unwrap_or(""),
                attributes.join(" ")
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct MessageViewModel {
    pub message: String,
}

impl fmt::Display for MessageViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.message)
    }
}

fn display_or<T: fmt::Display>(value: Option<T>, fallback: &str) -> String {
    value.map_or_else(|| fallback.to_string(), |v| v.to_string())
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viewconf_types::{FieldId, FieldKind, ModelField, ModelId};

    #[test]
    fn test_line_table() {
        let mut line = Line::for_field(
            CustomizationId::new(1),
            ModelField {
                id: FieldId::new(3),
                model: ModelId::new(1),
                name: "name".to_string(),
                kind: FieldKind::Char,
                relation: None,
                description: None,
            },
        );
        line.id = Some(LineId::new(12));
        line.options.searchable = true;

        assert_eq!(
            LineTable(&[line]).to_string(),
            "ID     KIND     NAME                     SEQ   EXPAND  OPTIONAL  SEARCHABLE  SUM\n\
             12     field    name                     100   -       -         yes         no\n"
        );
    }
}
