use std::{fmt, marker::PhantomData};

use api_types::{
    account::{Account, AccountInput},
    budget::{Budget, BudgetInput},
    invoice::{InvoiceItem, InvoiceItemInput},
    media::{MediaUsage, MediaUsageInput},
    shop::{Shop, ShopInput},
};
use async_trait::async_trait;
use engine::{AsyncOperationRunner, Entity, EntityFacade, Outcome, Period, Remote};
use serde::{Serialize, de::DeserializeOwned};

use crate::{client::Client, error::ClientError};

/// A REST collection: `GET path`, `POST path`, `PUT path/{key}`,
/// `DELETE path/{key}`.
pub trait Endpoint: Send + Sync + 'static {
    type Item: Entity + DeserializeOwned + Send + 'static;
    type Input: Serialize + Send + Sync + 'static;

    const PATH: &'static str;
}

pub struct Accounts;

impl Endpoint for Accounts {
    type Item = Account;
    type Input = AccountInput;

    const PATH: &'static str = "accounts";
}

pub struct Budgets;

impl Endpoint for Budgets {
    type Item = Budget;
    type Input = BudgetInput;

    const PATH: &'static str = "budgets";
}

pub struct InvoiceItems;

impl Endpoint for InvoiceItems {
    type Item = InvoiceItem;
    type Input = InvoiceItemInput;

    const PATH: &'static str = "invoices/items";
}

pub struct MediaUsages;

impl Endpoint for MediaUsages {
    type Item = MediaUsage;
    type Input = MediaUsageInput;

    const PATH: &'static str = "media/usage";
}

pub struct Shops;

impl Endpoint for Shops {
    type Item = Shop;
    type Input = ShopInput;

    const PATH: &'static str = "shops";
}

/// [`Remote`] backed by one REST collection.
pub struct RestRemote<E> {
    client: Client,
    endpoint: PhantomData<fn() -> E>,
}

impl<E> Clone for RestRemote<E> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            endpoint: PhantomData,
        }
    }
}

impl<E: Endpoint> fmt::Debug for RestRemote<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestRemote")
            .field("path", &E::PATH)
            .field("client", &self.client)
            .finish()
    }
}

impl<E: Endpoint> RestRemote<E> {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            endpoint: PhantomData,
        }
    }

    fn item_path(key: &impl fmt::Display) -> String {
        format!("{}/{key}", E::PATH)
    }
}

#[async_trait]
impl<E> Remote for RestRemote<E>
where
    E: Endpoint,
    <E::Item as Entity>::Key: fmt::Display + Send,
{
    type Item = E::Item;
    type Input = E::Input;
    type Fault = ClientError;

    async fn list(&self, period: Period) -> Result<Outcome<Vec<E::Item>>, ClientError> {
        self.client.get(E::PATH, &period.query()).await
    }

    async fn create(&self, input: E::Input) -> Result<Outcome<E::Item>, ClientError> {
        self.client.post(E::PATH, &input).await
    }

    async fn update(
        &self,
        key: <E::Item as Entity>::Key,
        input: E::Input,
    ) -> Result<Outcome<E::Item>, ClientError> {
        self.client.put(&Self::item_path(&key), &input).await
    }

    async fn delete(&self, key: <E::Item as Entity>::Key) -> Result<Outcome<()>, ClientError> {
        self.client.delete(&Self::item_path(&key)).await
    }
}

/// Facade for one collection, sharing `client`'s connection pool.
pub fn facade<E>(client: &Client, runner: AsyncOperationRunner) -> EntityFacade<RestRemote<E>>
where
    E: Endpoint,
    <E::Item as Entity>::Key: fmt::Display + Send + 'static,
{
    EntityFacade::new(RestRemote::new(client.clone()), runner)
}
