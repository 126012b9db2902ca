//! Admin review client methods

use super::{ClientError, PortalClient, segment};
use crate::types::{AdminStats, ApplicationStatus, CompanyInfo, ReviewAction};
use reqwest::Method;

impl PortalClient {
    /// All applications, optionally restricted to one status
    pub async fn applications(
        &self,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<CompanyInfo>, ClientError> {
        let mut req = self.request(Method::GET, "/api/admin/applications");
        if let Some(status) = status {
            req = req.query(&[("status_filter", status.as_str())]);
        }
        self.execute_authenticated(req).await
    }

    /// Approve or reject a pending application
    pub async fn review_application(
        &self,
        company_id: &str,
        review: &ReviewAction,
    ) -> Result<CompanyInfo, ClientError> {
        let req = self
            .request(
                Method::PUT,
                &format!("/api/admin/applications/{}/review", segment(company_id)),
            )
            .json(review);
        self.execute_authenticated(req).await
    }

    pub async fn admin_stats(&self) -> Result<AdminStats, ClientError> {
        let req = self.request(Method::GET, "/api/admin/stats");
        self.execute_authenticated(req).await
    }
}
