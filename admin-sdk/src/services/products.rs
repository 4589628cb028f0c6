use crate::{
    client::ApiClient,
    errors::Result,
    models::{
        ImageFile, NewProduct, Product, ProductChange, ProductEnvelope, ProductFields,
        ProductFilters, ProductPage, ResourceId,
    },
    transport::{ApiRequest, MultipartForm},
    validation,
};

const PRODUCTS_PATH: &str = "/admin/products";
const IMAGE_FIELD: &str = "images";

#[derive(Clone)]
pub struct ProductService {
    client: ApiClient,
}

impl ProductService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, filters: &ProductFilters) -> Result<ProductPage> {
        let request = ApiRequest::get(PRODUCTS_PATH).with_query(filters.to_query());
        self.client.call(request).await
    }

    pub async fn get_by_id(&self, id: &ResourceId) -> Result<Product> {
        let envelope: ProductEnvelope = self
            .client
            .call(ApiRequest::get(format!("{PRODUCTS_PATH}/{id}")))
            .await?;
        Ok(envelope.product)
    }

    /// Create a product with its first images as one multipart request.
    ///
    /// Rejected without touching the network when the form is incomplete or
    /// the image batch breaks a limit.
    pub async fn create(&self, product: NewProduct) -> Result<ProductChange> {
        validation::validate_new_product(&product)?;

        let NewProduct { fields, images } = product;
        let mut form = MultipartForm::new()
            .text("title", &fields.title)
            .text("description", fields.description.as_deref().unwrap_or(""))
            .text(
                "category_id",
                fields
                    .category_id
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
            )
            .text("price", fields.price.unwrap_or_default())
            .text("discount", fields.discount.unwrap_or(0))
            .text("is_active", fields.is_active);
        for image in images {
            form = form.file(IMAGE_FIELD, image);
        }

        let request = ApiRequest::post(PRODUCTS_PATH).with_multipart(form);
        self.client.call(request).await
    }

    pub async fn update(&self, id: &ResourceId, fields: &ProductFields) -> Result<ProductChange> {
        validation::validate_product_fields(fields).into_result()?;
        let request = ApiRequest::put(format!("{PRODUCTS_PATH}/{id}")).with_json(fields)?;
        self.client.call(request).await
    }

    /// Flip the active flag. The new state is in `product` when echoed.
    pub async fn toggle_active(&self, id: &ResourceId) -> Result<ProductChange> {
        let request = ApiRequest::patch(format!("{PRODUCTS_PATH}/{id}/toggle"));
        self.client.call(request).await
    }

    /// Append images to a product that already holds `existing_images`.
    pub async fn add_images(
        &self,
        id: &ResourceId,
        images: Vec<ImageFile>,
        existing_images: usize,
    ) -> Result<ProductChange> {
        let mut errors = validation::validate_image_batch(&images, existing_images);
        if images.is_empty() {
            errors.add(validation::Field::Images, "At least one image is required");
        }
        errors.into_result()?;

        let form = images
            .into_iter()
            .fold(MultipartForm::new(), |form, image| form.file(IMAGE_FIELD, image));
        let request = ApiRequest::post(format!("{PRODUCTS_PATH}/{id}/images")).with_multipart(form);
        self.client.call(request).await
    }

    pub async fn delete_image(
        &self,
        product_id: &ResourceId,
        image_id: &ResourceId,
    ) -> Result<ProductChange> {
        let request = ApiRequest::delete(format!("{PRODUCTS_PATH}/{product_id}/images/{image_id}"));
        self.client.call(request).await
    }
}
