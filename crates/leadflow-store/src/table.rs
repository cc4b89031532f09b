//! CSV-backed lead table.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use leadflow_core::{Error, Lead, Result, OUTPUT_COLUMNS, REQUIRED_COLUMNS};
use tracing::info;

/// Leads in input order plus the header row they were read with.
#[derive(Debug, Clone, Default)]
pub struct LeadTable {
    headers: Vec<String>,
    leads: Vec<Lead>,
}

impl LeadTable {
    /// Read a CSV file. Fails when the file is unreadable or lacks a
    /// required column.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| Error::Input(format!("open {}: {}", path.display(), e)))?;
        let table = Self::from_reader(file)?;
        info!("Loaded {} leads from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()
            .map_err(|e| Error::Csv(e.to_string()))?
            .iter()
            .map(str::to_string)
            .collect();

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|col| !headers.iter().any(|h| h == col))
            .collect();
        if !missing.is_empty() {
            return Err(Error::Input(format!(
                "missing required column(s): {}",
                missing.join(", ")
            )));
        }

        let mut leads = Vec::new();
        for (idx, record) in rdr.records().enumerate() {
            let record = record.map_err(|e| Error::Csv(format!("row {}: {}", idx + 1, e)))?;
            let mut lead = Lead::default();
            for (col, header) in headers.iter().enumerate() {
                lead.set(header, record.get(col).unwrap_or(""));
            }
            leads.push(lead);
        }

        Ok(Self { headers, leads })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    /// Same header row, new records (e.g. after processing).
    pub fn with_leads(&self, leads: Vec<Lead>) -> Self {
        Self {
            headers: self.headers.clone(),
            leads,
        }
    }

    pub fn len(&self) -> usize {
        self.leads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leads.is_empty()
    }

    /// Input headers followed by any pipeline column the input lacked.
    pub fn output_headers(&self) -> Vec<String> {
        let mut headers = self.headers.clone();
        for col in OUTPUT_COLUMNS {
            if !headers.iter().any(|h| h == col) {
                headers.push(col.to_string());
            }
        }
        headers
    }

    /// Write the table as CSV, creating the parent directory if needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        self.to_writer(file)?;
        info!("Wrote {} leads to {}", self.len(), path.display());
        Ok(())
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let headers = self.output_headers();
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&headers)
            .map_err(|e| Error::Csv(e.to_string()))?;
        for lead in &self.leads {
            let row: Vec<String> = headers
                .iter()
                .map(|h| lead.get(h).unwrap_or_default())
                .collect();
            wtr.write_record(&row).map_err(|e| Error::Csv(e.to_string()))?;
        }
        wtr.flush()?;
        Ok(())
    }
}
