//! Company endpoints.

use serde::Deserialize;

use super::ApiClient;
use crate::errors::ClientError;
use crate::models::Company;

#[derive(Debug, Deserialize)]
struct CompaniesResponse {
    companies: Vec<Company>,
}

impl ApiClient {
    /// `GET /getAllCompanies`
    pub async fn all_companies(&self) -> Result<Vec<Company>, ClientError> {
        let response: CompaniesResponse = self.get_json("/getAllCompanies", &[]).await?;
        Ok(response.companies)
    }

    /// `GET /getCompanies` - the picker list used by the users view.
    pub async fn company_choices(&self) -> Result<Vec<Company>, ClientError> {
        let response: CompaniesResponse = self.get_json("/getCompanies", &[]).await?;
        Ok(response.companies)
    }
}
