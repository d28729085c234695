//! Bulletin - medie di un élève calcolate dai voti scaricati
//!
//! Ogni voto è riportato su 20 e pesato con il proprio coefficiente; la media
//! generale pesa le materie con il coefficiente del corso.

use crate::entities::{Cours, Note};

#[derive(Debug, Clone, PartialEq)]
pub struct SubjectAverage {
    pub cours_id: String,
    pub titre: String,
    pub matiere: String,
    pub coefficient: f64,
    /// Su 20
    pub moyenne: f64,
    pub notes: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bulletin {
    pub eleve_id: String,
    pub subjects: Vec<SubjectAverage>,
    /// `None` senza nessun voto
    pub moyenne_generale: Option<f64>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl Bulletin {
    pub fn compute(eleve_id: &str, notes: &[Note], cours: &[Cours]) -> Self {
        let subjects: Vec<SubjectAverage> = cours
            .iter()
            .filter_map(|c| {
                let cours_id = c.id.as_deref()?;
                let (weighted, weights, count) = notes
                    .iter()
                    .filter(|n| n.eleve_id == eleve_id && n.cours_id == cours_id && n.sur > 0.0)
                    .fold((0.0, 0.0, 0usize), |(sum, w, count), n| {
                        (sum + n.valeur / n.sur * 20.0 * n.coefficient, w + n.coefficient, count + 1)
                    });
                if count == 0 || weights <= 0.0 {
                    return None;
                }
                Some(SubjectAverage {
                    cours_id: cours_id.to_string(),
                    titre: c.titre.clone(),
                    matiere: c.matiere.clone(),
                    coefficient: c.coefficient,
                    moyenne: round2(weighted / weights),
                    notes: count,
                })
            })
            .collect();

        let (weighted, weights) = subjects
            .iter()
            .fold((0.0, 0.0), |(sum, w), s| (sum + s.moyenne * s.coefficient, w + s.coefficient));
        let moyenne_generale = (weights > 0.0).then(|| round2(weighted / weights));

        Self {
            eleve_id: eleve_id.to_string(),
            subjects,
            moyenne_generale,
        }
    }
}
