use std::sync::Arc;

use uuid::Uuid;

use crate::application::dto::{
    CustomerListResponse, CustomerRequest, CustomerResponse, DeleteResponse, PageQuery,
};
use crate::application::errors::{EntityKind, HandlerError};
use crate::domain::customer::{Customer, Email, PhoneNumber};
use crate::metrics::Metrics;
use crate::store::{page_of, DataContext};
use super::{commit, observe};

#[derive(Clone)]
pub struct CustomerHandler {
    context: Arc<dyn DataContext>,
    metrics: Option<Arc<Metrics>>,
}

impl CustomerHandler {
    pub fn new(context: Arc<dyn DataContext>) -> Self {
        Self {
            context,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Register a customer. The email must not belong to anyone yet.
    pub async fn create(&self, request: CustomerRequest) -> Result<CustomerResponse, HandlerError> {
        observe(self.metrics.as_deref(), "create_customer", self.create_customer(request)).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<CustomerResponse, HandlerError> {
        observe(self.metrics.as_deref(), "get_customer", self.get_customer(id)).await
    }

    pub async fn get_all(&self, query: PageQuery) -> Result<CustomerListResponse, HandlerError> {
        observe(self.metrics.as_deref(), "list_customers", self.list_customers(query)).await
    }

    /// Full-field update. Keeping one's own email is not a conflict.
    pub async fn update(
        &self,
        id: Uuid,
        request: CustomerRequest,
    ) -> Result<CustomerResponse, HandlerError> {
        observe(self.metrics.as_deref(), "update_customer", self.update_customer(id, request)).await
    }

    /// Delete a customer together with their orders
    pub async fn delete(&self, id: Uuid) -> Result<DeleteResponse, HandlerError> {
        observe(self.metrics.as_deref(), "delete_customer", self.delete_customer(id)).await
    }

    async fn create_customer(&self, request: CustomerRequest) -> Result<CustomerResponse, HandlerError> {
        let scope = self.context.begin();

        let customer = Customer::new(
            request.name,
            Email::new(request.email),
            PhoneNumber::new(request.phone),
            request.birth_date,
        )?;

        if scope.customers.email_exists(customer.email()).await? {
            return Err(HandlerError::Conflict(format!(
                "email {} is already in use",
                customer.email()
            )));
        }

        scope.customers.add(customer.clone()).await?;
        commit(&scope, self.metrics.as_deref()).await?;

        tracing::info!(customer_id = %customer.id(), "✅ Customer created");
        Ok(CustomerResponse::from(&customer))
    }

    async fn get_customer(&self, id: Uuid) -> Result<CustomerResponse, HandlerError> {
        let scope = self.context.begin();
        let customer = scope
            .customers
            .get_by_id(id)
            .await?
            .ok_or_else(|| HandlerError::not_found(EntityKind::Customer, id))?;

        Ok(CustomerResponse::from(&customer))
    }

    async fn list_customers(&self, query: PageQuery) -> Result<CustomerListResponse, HandlerError> {
        let scope = self.context.begin();
        let customers = scope.customers.get_all().await?;
        let total_count = customers.len();

        let (page, page_size) = (query.page(), query.page_size());
        let customers = page_of(customers, page, page_size)
            .iter()
            .map(CustomerResponse::from)
            .collect();

        Ok(CustomerListResponse {
            customers,
            page,
            page_size,
            total_count,
        })
    }

    async fn update_customer(
        &self,
        id: Uuid,
        request: CustomerRequest,
    ) -> Result<CustomerResponse, HandlerError> {
        let scope = self.context.begin();
        let mut customer = scope
            .customers
            .get_by_id(id)
            .await?
            .ok_or_else(|| HandlerError::not_found(EntityKind::Customer, id))?;

        let email = Email::new(request.email);
        if &email != customer.email() && scope.customers.email_exists(&email).await? {
            return Err(HandlerError::Conflict(format!("email {email} is already in use")));
        }

        customer.update(
            request.name,
            email,
            PhoneNumber::new(request.phone),
            request.birth_date,
        )?;

        scope.customers.update(customer.clone()).await?;
        commit(&scope, self.metrics.as_deref()).await?;

        tracing::info!(customer_id = %id, "✅ Customer updated");
        Ok(CustomerResponse::from(&customer))
    }

    async fn delete_customer(&self, id: Uuid) -> Result<DeleteResponse, HandlerError> {
        let scope = self.context.begin();
        if scope.customers.get_by_id(id).await?.is_none() {
            return Err(HandlerError::not_found(EntityKind::Customer, id));
        }

        scope.customers.delete(id).await?;
        commit(&scope, self.metrics.as_deref()).await?;

        tracing::info!(customer_id = %id, "✅ Customer deleted");
        Ok(DeleteResponse::deleted("Customer"))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{customer_request, memory, FailingCommit};
    use crate::store::MemoryDatabase;

    fn handler() -> CustomerHandler {
        let (_, context) = memory();
        CustomerHandler::new(context)
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let handler = handler();

        let created = handler.create(customer_request("Ana", "ana@x.com")).await.unwrap();
        let fetched = handler.get_by_id(created.id).await.unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.email, "ana@x.com");
    }

    #[tokio::test]
    async fn test_create_with_taken_email_conflicts() {
        let handler = handler();
        handler.create(customer_request("Ana", "ana@x.com")).await.unwrap();

        let result = handler.create(customer_request("Other Ana", "ana@x.com")).await;

        assert!(matches!(result, Err(HandlerError::Conflict(_))));
        let all = handler.get_all(PageQuery::default()).await.unwrap();
        assert_eq!(all.total_count, 1);
    }

    #[tokio::test]
    async fn test_create_with_invalid_email_is_rejected() {
        let result = handler().create(customer_request("Ana", "not-an-email")).await;
        assert!(matches!(result, Err(HandlerError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_get_unknown_customer_is_not_found() {
        let id = Uuid::now_v7();
        let result = handler().get_by_id(id).await;

        assert!(matches!(
            result,
            Err(HandlerError::NotFound { entity: EntityKind::Customer, id: missing }) if missing == id
        ));
    }

    #[tokio::test]
    async fn test_get_all_pages_and_counts() {
        let handler = handler();
        for i in 0..3 {
            handler
                .create(customer_request("Customer", &format!("c{i}@x.com")))
                .await
                .unwrap();
        }

        let page = handler
            .get_all(PageQuery {
                page: Some(2),
                page_size: Some(2),
            })
            .await
            .unwrap();

        assert_eq!(page.customers.len(), 1);
        assert_eq!(page.total_count, 3);
        assert_eq!((page.page, page.page_size), (2, 2));
    }

    #[tokio::test]
    async fn test_update_keeping_own_email_succeeds() {
        let handler = handler();
        let created = handler.create(customer_request("Ana", "ana@x.com")).await.unwrap();

        let updated = handler
            .update(created.id, customer_request("Ana Maria", "ana@x.com"))
            .await
            .unwrap();

        assert_eq!(updated.name, "Ana Maria");
        assert_eq!(handler.get_by_id(created.id).await.unwrap().name, "Ana Maria");
    }

    #[tokio::test]
    async fn test_update_to_someone_elses_email_conflicts() {
        let handler = handler();
        handler.create(customer_request("Ana", "ana@x.com")).await.unwrap();
        let bruno = handler.create(customer_request("Bruno", "bruno@x.com")).await.unwrap();

        let result = handler
            .update(bruno.id, customer_request("Bruno", "ana@x.com"))
            .await;

        assert!(matches!(result, Err(HandlerError::Conflict(_))));
        assert_eq!(handler.get_by_id(bruno.id).await.unwrap().email, "bruno@x.com");
    }

    #[tokio::test]
    async fn test_update_unknown_customer_is_not_found() {
        let result = handler()
            .update(Uuid::now_v7(), customer_request("Ana", "ana@x.com"))
            .await;
        assert!(matches!(result, Err(HandlerError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_absent_customer_is_not_found() {
        let result = handler().delete(Uuid::now_v7()).await;
        assert!(matches!(
            result,
            Err(HandlerError::NotFound { entity: EntityKind::Customer, .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_customer() {
        let handler = handler();
        let created = handler.create(customer_request("Ana", "ana@x.com")).await.unwrap();

        let response = handler.delete(created.id).await.unwrap();

        assert!(response.success);
        assert!(handler.get_by_id(created.id).await.is_err());
    }

    #[tokio::test]
    async fn test_failed_commit_is_unexpected_and_persists_nothing() {
        let db = MemoryDatabase::new();
        let failing = CustomerHandler::new(Arc::new(FailingCommit { db: db.clone() }));

        let result = failing.create(customer_request("Ana", "ana@x.com")).await;

        assert!(matches!(result, Err(HandlerError::Unexpected(_))));
        let reader = CustomerHandler::new(Arc::new(db));
        assert_eq!(reader.get_all(PageQuery::default()).await.unwrap().total_count, 0);
    }

    #[tokio::test]
    async fn test_outcomes_are_recorded_when_metrics_are_attached() {
        let metrics = Arc::new(Metrics::new().unwrap());
        let handler = handler().with_metrics(metrics.clone());

        handler.create(customer_request("Ana", "ana@x.com")).await.unwrap();
        let _ = handler.get_by_id(Uuid::now_v7()).await;

        let created = metrics
            .workflow_total
            .with_label_values(&["create_customer", "ok"])
            .get();
        let missing = metrics
            .workflow_total
            .with_label_values(&["get_customer", "not_found"])
            .get();
        assert_eq!((created, missing), (1, 1));
        assert_eq!(metrics.commits_total.with_label_values(&["committed"]).get(), 1);
    }
}
