//! Supplier application client methods

use super::{ClientError, PortalClient, segment};
use crate::types::{CompanyData, CompanyInfo};
use reqwest::Method;

impl PortalClient {
    /// Submit the caller's supplier application. One per user.
    pub async fn create_company(&self, data: &CompanyData) -> Result<CompanyInfo, ClientError> {
        let req = self.request(Method::POST, "/api/companies").json(data);
        self.execute_authenticated(req).await
    }

    /// The caller's own application
    pub async fn my_application(&self) -> Result<CompanyInfo, ClientError> {
        let req = self.request(Method::GET, "/api/companies/my-application");
        self.execute_authenticated(req).await
    }

    /// An application by company id; owners and admins only
    pub async fn company(&self, company_id: &str) -> Result<CompanyInfo, ClientError> {
        let req = self.request(
            Method::GET,
            &format!("/api/companies/{}", segment(company_id)),
        );
        self.execute_authenticated(req).await
    }
}
