use std::path::Path;

/// Published schema package expected for one processing year.
#[derive(Debug, Clone, Copy)]
pub struct SchemaManifest {
    pub version: &'static str,
    pub files: [&'static str; 5],
}

const MANIFEST_2024: SchemaManifest = SchemaManifest {
    version: "2024v1.0",
    files: [
        "efile1040x_2024v1.0.xsd",
        "IRS1040_2024v1.0.xsd",
        "efileTypes_2024v1.0.xsd",
        "IRSW2_2024v1.0.xsd",
        "IRS1040ScheduleC_2024v1.0.xsd",
    ],
};

const MANIFEST_2023: SchemaManifest = SchemaManifest {
    version: "2023v1.0",
    files: [
        "efile1040x_2023v1.0.xsd",
        "IRS1040_2023v1.0.xsd",
        "efileTypes_2023v1.0.xsd",
        "IRSW2_2023v1.0.xsd",
        "IRS1040ScheduleC_2023v1.0.xsd",
    ],
};

impl SchemaManifest {
    pub fn for_year(tax_year: i32) -> Option<&'static SchemaManifest> {
        match tax_year {
            2024 => Some(&MANIFEST_2024),
            2023 => Some(&MANIFEST_2023),
            _ => None,
        }
    }

    /// Manifest files not readable under `schema_root`.
    pub fn missing_files(&self, schema_root: &Path) -> Vec<&'static str> {
        self.files
            .iter()
            .filter(|file| !schema_root.join(file).is_file())
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn manifests_exist_for_supported_years() {
        assert_eq!(SchemaManifest::for_year(2024).unwrap().version, "2024v1.0");
        assert_eq!(SchemaManifest::for_year(2023).unwrap().version, "2023v1.0");
        assert!(SchemaManifest::for_year(2022).is_none());
        assert!(SchemaManifest::for_year(2025).is_none());
    }

    #[test]
    fn missing_files_reports_everything_for_an_empty_root() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = SchemaManifest::for_year(2024).unwrap();

        let missing = manifest.missing_files(dir.path());
        assert_eq!(missing.len(), 5);
        assert!(missing.contains(&"efile1040x_2024v1.0.xsd"));
    }

    #[test]
    fn missing_files_shrinks_as_files_appear() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = SchemaManifest::for_year(2024).unwrap();
        std::fs::write(dir.path().join("IRS1040_2024v1.0.xsd"), "<!-- xsd -->").unwrap();

        let missing = manifest.missing_files(dir.path());
        assert_eq!(missing.len(), 4);
        assert!(!missing.contains(&"IRS1040_2024v1.0.xsd"));
    }
}
