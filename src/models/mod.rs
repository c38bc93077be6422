// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Point d'entrée pour tous les modèles de données.
//   Chaque modèle correspond à une table PostgreSQL avec SeaORM.
//
// Liste des modules:
//   - users : Comptes utilisateurs (l'admin est l'utilisateur id 1)
//   - movies : Catalogue de films (titre unique, note, critique)
//   - comments : Fil de commentaires global (FK vers users)
//   - dto : Data Transfer Objects pour les réponses API
//
// Points d'attention:
//   - Tous les modèles utilisent SeaORM (pas de SQL brut)
//   - Les contraintes unique/not-null sont portées par la BD (schema.sql)
//   - Les relations entre tables sont définies dans chaque modèle
//
// ============================================================================

pub mod users;
pub mod movies;
pub mod comments;
pub mod dto;
