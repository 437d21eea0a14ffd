pub mod m202510190001_create_submissions;
pub mod m202510190002_create_payments;
