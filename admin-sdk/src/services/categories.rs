use crate::{
    client::ApiClient,
    errors::Result,
    models::{Category, CategoryChange, CategoryFields, CategoryList, ResourceId},
    transport::ApiRequest,
    validation,
};

const CATEGORIES_PATH: &str = "/admin/categories";

#[derive(Clone)]
pub struct CategoryService {
    client: ApiClient,
}

impl CategoryService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List categories, optionally only active (`Some(true)`) or inactive ones.
    pub async fn list(&self, active: Option<bool>) -> Result<Vec<Category>> {
        let query = active
            .map(|active| vec![("is_active".to_string(), active.to_string())])
            .unwrap_or_default();
        let list: CategoryList = self
            .client
            .call(ApiRequest::get(CATEGORIES_PATH).with_query(query))
            .await?;
        Ok(list.categories)
    }

    pub async fn create(&self, fields: &CategoryFields) -> Result<CategoryChange> {
        validation::validate_category(fields)?;
        let request = ApiRequest::post(CATEGORIES_PATH).with_json(fields)?;
        self.client.call(request).await
    }

    pub async fn update(&self, id: &ResourceId, fields: &CategoryFields) -> Result<CategoryChange> {
        validation::validate_category(fields)?;
        let request = ApiRequest::put(format!("{CATEGORIES_PATH}/{id}")).with_json(fields)?;
        self.client.call(request).await
    }

    /// Flip the active flag. The new state is in `category` when echoed.
    pub async fn toggle_active(&self, id: &ResourceId) -> Result<CategoryChange> {
        let request = ApiRequest::patch(format!("{CATEGORIES_PATH}/{id}/toggle"));
        self.client.call(request).await
    }
}
