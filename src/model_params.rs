//! Parameter bookkeeping shared by correlation models.
//!
//! Each model registers its parameters once, in the order in which they appear in the
//! parameter vector passed to its evaluate methods. The registered value, error and fixed
//! flag are the starting point handed to an external fitting driver; they never influence
//! the model's own evaluation.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::io;

/// A single named model parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParameter {
    /// Parameter name, unique within its model
    pub name: String,
    /// Initial value
    pub value: f64,
    /// Initial uncertainty, used by fitters as a step size
    pub error: f64,
    /// Whether the fitter must hold this parameter at its value
    pub fixed: bool,
}

/// Column layout used when printing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReportFormat {
    pub width: usize,
    pub precision: usize,
}

impl Default for ReportFormat {
    fn default() -> Self {
        Self {
            width: 12,
            precision: 6,
        }
    }
}

/// Ordered parameter schema of a model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    model_name: String,
    params: Vec<ModelParameter>,
}

impl ParameterSet {
    pub fn new(model_name: &str) -> Self {
        Self {
            model_name: model_name.to_string(),
            params: Vec::new(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Append a parameter. Its position in the parameter vector is its registration order.
    pub fn define_parameter(
        &mut self,
        name: &str,
        value: f64,
        error: f64,
        fixed: bool,
    ) -> Result<usize> {
        if self.index_of(name).is_some() {
            return Err(anyhow!(
                "Parameter '{}' is already defined for model '{}'",
                name,
                self.model_name
            ));
        }
        self.params.push(ModelParameter {
            name: name.to_string(),
            value,
            error,
            fixed,
        });
        Ok(self.params.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ModelParameter> {
        self.params.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelParameter> {
        self.params.iter()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|p| p.name == name)
    }

    /// Names in parameter-vector order
    pub fn names(&self) -> Vec<&str> {
        self.params.iter().map(|p| p.name.as_str()).collect()
    }

    /// Initial parameter vector
    pub fn values(&self) -> Vec<f64> {
        self.params.iter().map(|p| p.value).collect()
    }

    pub fn errors(&self) -> Vec<f64> {
        self.params.iter().map(|p| p.error).collect()
    }

    /// Number of parameters a fitter is allowed to vary.
    pub fn free_count(&self) -> usize {
        self.params.iter().filter(|p| !p.fixed).count()
    }

    /// Print one line per parameter.
    pub fn print_to_stream(
        &self,
        out: &mut dyn io::Write,
        format: &ReportFormat,
    ) -> io::Result<()> {
        let name_width = self.params.iter().map(|p| p.name.len()).max().unwrap_or(0);
        let (w, prec) = (format.width, format.precision);

        writeln!(
            out,
            "Correlation model \"{}\" has {} parameters ({} free):",
            self.model_name,
            self.len(),
            self.free_count()
        )?;
        for (idx, p) in self.params.iter().enumerate() {
            writeln!(
                out,
                "[{:>2}] {:<name_width$} = {:>w$.prec$} +/- {:>w$.prec$}{}",
                idx,
                p.name,
                p.value,
                p.error,
                if p.fixed { " (fixed)" } else { "" },
            )?;
        }
        Ok(())
    }
}
