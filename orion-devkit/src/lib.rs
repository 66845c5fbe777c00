/*!
# Orion DevKit - Mocks et utilitaires de test

Bibliothèque facilitant les tests d'orion-remediate sans serveur Orion:
- Inventaire SWIS simulé (requêtes, écritures, invocations, pannes)
- Connecteur multi-serveurs simulé
- Builders de lignes Orion.Nodes
*/

pub mod fixtures;
pub mod mock_inventory;
pub mod test_utils;

pub use fixtures::{node_uri, NodeRowBuilder};
pub use mock_inventory::{MockConnector, MockInventory, RecordedInvoke, RecordedWrite};
pub use test_utils::TestHarness;
