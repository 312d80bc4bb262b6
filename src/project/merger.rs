use super::document::ProjectDocument;
use crate::core::{ConvertError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Container that receives newly inserted properties.
pub const PROPERTY_GROUP: &str = "PropertyGroup";

/// What `upsert_property` did to the document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropertyChange {
    Inserted,
    Updated { previous: String },
    Unchanged,
}

impl PropertyChange {
    pub fn changed(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

impl ProjectDocument {
    /// Set `name` to `value`, in memory only.
    ///
    /// Existing values are compared case-insensitively. More than one element
    /// named `name` is refused before anything is modified.
    pub fn upsert_property(&mut self, name: &str, value: &str) -> Result<PropertyChange> {
        match self.count_elements(name) {
            0 => {
                if !self.append_child_element(PROPERTY_GROUP, name, value) {
                    return Err(ConvertError::malformed(
                        "the project has no PropertyGroup; check that this is a valid csproj file",
                        self.path(),
                    ));
                }
                Ok(PropertyChange::Inserted)
            }
            1 => {
                let path = self.path().to_path_buf();
                let Some(element) = self.first_element_mut(name) else {
                    return Err(ConvertError::malformed(
                        format!("<{name}> disappeared while updating"),
                        path,
                    ));
                };
                let previous = element.text()?;
                if previous.to_lowercase() == value.to_lowercase() {
                    return Ok(PropertyChange::Unchanged);
                }
                element.set_text(value);
                Ok(PropertyChange::Updated { previous })
            }
            count => Err(ConvertError::AmbiguousProperty {
                name: name.to_string(),
                count,
                path: self.path().to_path_buf(),
            }),
        }
    }

    /// Text of the single element named `name`, if present.
    pub fn property(&self, name: &str) -> Result<Option<String>> {
        match self.count_elements(name) {
            0 => Ok(None),
            1 => self.first_element(name).map(|e| e.text()).transpose(),
            count => Err(ConvertError::AmbiguousProperty {
                name: name.to_string(),
                count,
                path: self.path().to_path_buf(),
            }),
        }
    }
}

/// A project file on disk together with its parsed tree.
#[derive(Debug)]
pub struct ProjectDescriptor {
    path: PathBuf,
    document: ProjectDocument,
}

impl ProjectDescriptor {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let text = fs::read_to_string(&path)
            .map_err(|e| ConvertError::io("Failed to read project file", &path, e))?;
        let document = ProjectDocument::parse(&text, &path)?;
        Ok(Self { path, document })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &ProjectDocument {
        &self.document
    }

    pub fn property(&self, name: &str) -> Result<Option<String>> {
        self.document.property(name)
    }

    /// Upsert a property and write the file back when it changed.
    /// Returns whether anything changed.
    pub fn set_property(&mut self, name: &str, value: &str) -> Result<bool> {
        let change = self.document.upsert_property(name, value)?;
        match &change {
            PropertyChange::Inserted => {
                info!("Added <{name}>{value}</{name}> to {}", self.path.display())
            }
            PropertyChange::Updated { previous } => {
                info!("Changed {name} from '{previous}' to '{value}'")
            }
            PropertyChange::Unchanged => debug!("{name} is already '{value}'"),
        }
        if change.changed() {
            self.save()?;
        }
        Ok(change.changed())
    }

    fn save(&self) -> Result<()> {
        let text = self.document.to_xml_string()?;
        fs::write(&self.path, text)
            .map_err(|e| ConvertError::io("Failed to write project file", &self.path, e))
    }
}

/// Load the project at `path`, set one property, and persist when changed.
pub fn set_property(path: impl AsRef<Path>, name: &str, value: &str) -> Result<bool> {
    ProjectDescriptor::load(path)?.set_property(name, value)
}
