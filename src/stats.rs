use std::ops::Add;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BackupStats {
    pub files_scanned: u64,
    pub files_present: u64,
    pub files_uploaded: u64,
    pub upload_failures: u64,
    pub scan_errors: u64,
    pub bytes_uploaded: u64,
    pub files_deleted: u64,
    pub delete_failures: u64,
}

impl BackupStats {
    pub fn new() -> Self {
        BackupStats::default()
    }

    pub fn merge(&mut self, other: BackupStats) {
        *self = *self + other;
    }

    pub fn error_count(&self) -> u64 {
        self.upload_failures + self.scan_errors + self.delete_failures
    }

    pub fn is_clean(&self) -> bool {
        self.error_count() == 0
    }
}

impl Add for BackupStats {
    type Output = BackupStats;

    fn add(self, other: BackupStats) -> BackupStats {
        BackupStats {
            files_scanned: self.files_scanned + other.files_scanned,
            files_present: self.files_present + other.files_present,
            files_uploaded: self.files_uploaded + other.files_uploaded,
            upload_failures: self.upload_failures + other.upload_failures,
            scan_errors: self.scan_errors + other.scan_errors,
            bytes_uploaded: self.bytes_uploaded + other.bytes_uploaded,
            files_deleted: self.files_deleted + other.files_deleted,
            delete_failures: self.delete_failures + other.delete_failures,
        }
    }
}
