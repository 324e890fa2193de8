use serde_json::{json, Value};

use crate::candidatures::domain::Candidature;

pub(super) fn record(id: u64, nom: &str, competences: &[&str]) -> Value {
    json!({
        "id": id,
        "nom": nom,
        "poste": "Développeur backend",
        "statut": "En attente",
        "competences": competences,
        "experience": "3 ans",
        "dateCandidature": "2026-02-09T10:30:00.000Z",
        "email": format!("candidat{id}@example.dz"),
        "telephone": "+213 555 00 00 00",
        "cv": format!("https://cv.example.dz/{id}.pdf"),
        "lettreMotivation": "Motivé par le poste.",
        "salaireSouhaite": 120000,
        "disponibilite": "Immédiate",
        "localisation": "Alger",
        "commentaires": []
    })
}

pub(super) fn decoded(record: Value) -> Candidature {
    Candidature::from_record(record).expect("fixture decodes")
}

pub(super) fn candidature(id: u64, nom: &str, competences: &[&str]) -> Candidature {
    decoded(record(id, nom, competences))
}

pub(super) fn roster() -> Vec<Candidature> {
    let mut amel = record(1, "Amel Benali", &["Python", "Django", "PostgreSQL"]);
    amel["commentaires"] = json!([{
        "id": 10,
        "auteur": "RH",
        "date": "2026-02-10T09:00:00Z",
        "contenu": "Profil très solide en Kubernetes"
    }]);

    let mut karim = record(2, "Karim Haddad", &["Rust", "Go"]);
    karim["localisation"] = json!("Oran");

    let mut sara = record(3, "Sara Meziane", &["Data science", "python"]);
    sara["poste"] = json!("Data analyst");

    [amel, karim, sara].into_iter().map(decoded).collect()
}

pub(super) fn names(records: &[Candidature]) -> Vec<&str> {
    records.iter().map(|record| record.nom.as_str()).collect()
}
