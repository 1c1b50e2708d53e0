//! Default catalog of muscle groups and exercises.
//!
//! This module provides the built-in exercise library for the system.

use crate::config::CatalogConfig;
use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog_internal);

/// Get a reference to the cached default catalog
///
/// This function returns a reference to the pre-built catalog, avoiding
/// the overhead of rebuilding it on every operation.
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Builds the default catalog with the built-in groups and exercises
///
/// **Note**: For production use, prefer `get_default_catalog()` which returns a
/// cached reference. This function is retained for testing and custom catalog creation.
pub fn build_default_catalog() -> Catalog {
    build_default_catalog_internal()
}

/// Build the catalog extended with custom exercises from configuration
///
/// Custom entries that reference an unknown group or reuse an existing id
/// are skipped with a warning rather than failing catalog construction.
pub fn build_catalog(catalog_config: &CatalogConfig) -> Catalog {
    let mut catalog = get_default_catalog().clone();

    for custom in &catalog_config.custom {
        if !catalog.groups.contains_key(&custom.group_id) {
            tracing::warn!(
                "Skipping custom exercise '{}': unknown group '{}'",
                custom.id,
                custom.group_id
            );
            continue;
        }
        if catalog.exercises.contains_key(&custom.id) {
            tracing::warn!(
                "Skipping custom exercise '{}': id already in catalog",
                custom.id
            );
            continue;
        }
        catalog.exercises.insert(
            custom.id.clone(),
            Exercise {
                id: custom.id.clone(),
                name: custom.name.clone(),
                group_id: custom.group_id.clone(),
                description: custom.description.clone(),
            },
        );
    }

    catalog
}

/// Internal function that actually builds the catalog
fn build_default_catalog_internal() -> Catalog {
    let mut groups = HashMap::new();
    let mut exercises = HashMap::new();

    // ========================================================================
    // Muscle Groups
    // ========================================================================

    for (id, name) in [
        ("abdomen", "Abdômen"),
        ("biceps", "Bíceps"),
        ("costas", "Costas"),
        ("ombros", "Ombros"),
        ("peito", "Peito"),
        ("pernas", "Pernas"),
        ("triceps", "Tríceps"),
    ] {
        groups.insert(
            id.into(),
            ExerciseGroup {
                id: id.into(),
                name: name.into(),
            },
        );
    }

    // ========================================================================
    // Exercises
    // ========================================================================

    let entries: [(&str, &str, &str, &str); 21] = [
        (
            "abdominal_supra",
            "Abdominal Supra",
            "abdomen",
            "Deitado, eleve o tronco contraindo o abdômen.",
        ),
        (
            "prancha",
            "Prancha",
            "abdomen",
            "Sustente o corpo reto apoiado nos antebraços.",
        ),
        (
            "elevacao_de_pernas",
            "Elevação de Pernas",
            "abdomen",
            "Deitado, eleve as pernas estendidas até a vertical.",
        ),
        (
            "rosca_direta",
            "Rosca Direta",
            "biceps",
            "Flexione os cotovelos com a barra, sem balançar o tronco.",
        ),
        (
            "rosca_martelo",
            "Rosca Martelo",
            "biceps",
            "Halteres em pegada neutra, cotovelos junto ao corpo.",
        ),
        (
            "rosca_concentrada",
            "Rosca Concentrada",
            "biceps",
            "Sentado, cotovelo apoiado na coxa, suba o halter.",
        ),
        (
            "remada_curvada",
            "Remada Curvada",
            "costas",
            "Tronco inclinado, puxe a barra em direção ao abdômen.",
        ),
        (
            "puxada_alta",
            "Puxada Alta",
            "costas",
            "Na polia, puxe a barra até a altura do peito.",
        ),
        (
            "levantamento_terra",
            "Levantamento Terra",
            "costas",
            "Levante a barra do chão com a coluna neutra.",
        ),
        (
            "desenvolvimento_militar",
            "Desenvolvimento Militar",
            "ombros",
            "Empurre a barra acima da cabeça, núcleo firme.",
        ),
        (
            "elevacao_lateral",
            "Elevação Lateral",
            "ombros",
            "Eleve os halteres lateralmente até a linha dos ombros.",
        ),
        (
            "remada_alta",
            "Remada Alta",
            "ombros",
            "Puxe a barra verticalmente até a altura do queixo.",
        ),
        (
            "supino_reto",
            "Supino Reto",
            "peito",
            "Deitado no banco, desça a barra ao peito e empurre.",
        ),
        (
            "crucifixo",
            "Crucifixo",
            "peito",
            "Abra e feche os braços com halteres sobre o banco.",
        ),
        (
            "flexao_de_braco",
            "Flexão de Braço",
            "peito",
            "Corpo reto, desça o peito até quase tocar o chão.",
        ),
        (
            "agachamento",
            "Agachamento",
            "pernas",
            "Desça até as coxas ficarem paralelas ao chão.",
        ),
        (
            "leg_press",
            "Leg Press",
            "pernas",
            "Empurre a plataforma sem estender totalmente os joelhos.",
        ),
        (
            "cadeira_extensora",
            "Cadeira Extensora",
            "pernas",
            "Estenda os joelhos contra a resistência do aparelho.",
        ),
        (
            "triceps_testa",
            "Tríceps Testa",
            "triceps",
            "Deitado, flexione os cotovelos levando a barra à testa.",
        ),
        (
            "triceps_corda",
            "Tríceps Corda",
            "triceps",
            "Na polia, estenda os cotovelos junto ao corpo.",
        ),
        (
            "mergulho",
            "Mergulho",
            "triceps",
            "Entre barras paralelas, desça flexionando os cotovelos.",
        ),
    ];

    for (id, name, group_id, description) in entries {
        exercises.insert(
            id.into(),
            Exercise {
                id: id.into(),
                name: name.into(),
                group_id: group_id.into(),
                description: Some(description.into()),
            },
        );
    }

    Catalog { groups, exercises }
}

impl Catalog {
    /// Look up an exercise by id
    pub fn exercise(&self, id: &str) -> Option<&Exercise> {
        self.exercises.get(id)
    }

    /// Groups sorted by display name, for stable listing
    pub fn sorted_groups(&self) -> Vec<&ExerciseGroup> {
        let mut groups: Vec<&ExerciseGroup> = self.groups.values().collect();
        groups.sort_by(|a, b| a.name.cmp(&b.name));
        groups
    }

    /// Exercises of one group sorted by display name
    pub fn exercises_in_group(&self, group_id: &str) -> Vec<&Exercise> {
        let mut exercises: Vec<&Exercise> = self
            .exercises
            .values()
            .filter(|e| e.group_id == group_id)
            .collect();
        exercises.sort_by(|a, b| a.name.cmp(&b.name));
        exercises
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (id, group) in &self.groups {
            if id.is_empty() || group.id.is_empty() {
                errors.push("Group has empty ID".to_string());
            }
            if id != &group.id {
                errors.push(format!(
                    "Group key '{}' doesn't match group.id '{}'",
                    id, group.id
                ));
            }
            if group.name.is_empty() {
                errors.push(format!("Group '{}' has empty name", id));
            }
        }

        for (id, exercise) in &self.exercises {
            if id.is_empty() || exercise.id.is_empty() {
                errors.push("Exercise has empty ID".to_string());
            }
            if id != &exercise.id {
                errors.push(format!(
                    "Exercise key '{}' doesn't match exercise.id '{}'",
                    id, exercise.id
                ));
            }
            if exercise.name.is_empty() {
                errors.push(format!("Exercise '{}' has empty name", id));
            }
            if !self.groups.contains_key(&exercise.group_id) {
                errors.push(format!(
                    "Exercise '{}' references non-existent group '{}'",
                    id, exercise.group_id
                ));
            }
        }

        // Every group should have at least one exercise to show
        for id in self.groups.keys() {
            if !self.exercises.values().any(|e| &e.group_id == id) {
                errors.push(format!("Group '{}' has no exercises", id));
            }
        }

        errors
    }
}
