pub mod json_entity_store;
