use anyhow::Result;
use futures::stream::StreamExt;
use mongodb::{
    bson::{self, doc, oid::ObjectId, to_bson, Document},
    Collection,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::error;

/// Mapping between a domain entity and its raw mongo document
pub trait MongoDocument<E>: Serialize + DeserializeOwned {
    fn to_domain(self) -> E;
    fn from_domain(entity: &E) -> Self;
    fn get_id_filter(&self) -> Document;
}

fn get_id_filter(oid: &ObjectId) -> Document {
    doc! {
        "_id": oid
    }
}

fn entity_to_persistence<E, D: MongoDocument<E>>(entity: &E) -> Document {
    let raw = D::from_domain(entity);
    doc_to_persistence(&raw)
}

fn persistence_to_entity<E, D: MongoDocument<E>>(doc: Document) -> Option<E> {
    match bson::from_document::<D>(doc) {
        Ok(raw) => Some(raw.to_domain()),
        Err(e) => {
            // A malformed document must not kill a dispatch pass
            error!("Unable to deserialize mongo document: {:?}", e);
            None
        }
    }
}

fn doc_to_persistence<E, D: MongoDocument<E>>(raw: &D) -> Document {
    to_bson(raw).unwrap().as_document().unwrap().to_owned()
}

pub async fn insert<E, D: MongoDocument<E>>(
    collection: &Collection<Document>,
    entity: &E,
) -> Result<()> {
    let doc = entity_to_persistence::<E, D>(entity);
    collection.insert_one(doc, None).await?;
    Ok(())
}

pub async fn save<E, D: MongoDocument<E>>(
    collection: &Collection<Document>,
    entity: &E,
) -> Result<()> {
    let raw = D::from_domain(entity);
    let filter = raw.get_id_filter();
    let doc = doc_to_persistence(&raw);
    collection.replace_one(filter, doc, None).await?;
    Ok(())
}

pub async fn find<E, D: MongoDocument<E>>(
    collection: &Collection<Document>,
    oid: &ObjectId,
) -> Option<E> {
    let filter = get_id_filter(oid);
    find_one_by::<E, D>(collection, filter).await
}

pub async fn find_one_by<E, D: MongoDocument<E>>(
    collection: &Collection<Document>,
    filter: Document,
) -> Option<E> {
    match collection.find_one(filter, None).await {
        Ok(doc) => doc.and_then(persistence_to_entity::<E, D>),
        Err(e) => {
            error!("Error while finding mongo document: {:?}", e);
            None
        }
    }
}

pub async fn find_many_by<E, D: MongoDocument<E>>(
    collection: &Collection<Document>,
    filter: Document,
) -> Result<Vec<E>> {
    let mut cursor = collection.find(filter, None).await?;
    let mut entities = Vec::new();
    while let Some(doc) = cursor.next().await {
        if let Some(entity) = persistence_to_entity::<E, D>(doc?) {
            entities.push(entity);
        }
    }
    Ok(entities)
}

/// Narrow update of specific fields on all documents matching the filter.
/// Marker commits go through here: `$set` of a single field or `$addToSet`
/// on a threshold set, never a whole-document replace, so concurrent
/// business-field writes by the rest of the application are not clobbered.
pub async fn update_many(
    collection: &Collection<Document>,
    filter: Document,
    update: Document,
) -> Result<()> {
    collection.update_many(filter, update, None).await?;
    Ok(())
}
