pub const QUERY_CREATE_MEDICAL_RECORD_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS MedicalRecord (
    id TEXT PRIMARY KEY NOT NULL,
    petId TEXT NOT NULL,
    lastVisitDate TEXT NOT NULL,
    weight REAL NOT NULL,
    healthStatus TEXT NOT NULL,
    diseases TEXT,
    treatments TEXT,
    vaccinations TEXT NOT NULL,
    allergies TEXT,
    specialCare TEXT,
    sterilized INTEGER NOT NULL,
    createdAt INTEGER NOT NULL
);
"#;

pub const QUERY_CREATE_MEDICAL_RECORD_PET_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_medical_record_pet_created
ON MedicalRecord (petId, createdAt DESC);
"#;

pub const QUERY_INSERT_MEDICAL_RECORD: &str = r#"
INSERT INTO MedicalRecord (
    id,petId,lastVisitDate,weight,healthStatus,
    diseases,treatments,vaccinations,allergies,specialCare,
    sterilized,createdAt
) VALUES(
    $1,$2,$3,$4,$5,
    $6,$7,$8,$9,$10,
    $11,$12
);
"#;

pub const QUERY_GET_PET_MEDICAL_RECORDS: &str = r#"
SELECT
    id,petId,lastVisitDate,weight,healthStatus,
    diseases,treatments,vaccinations,allergies,specialCare,
    sterilized,createdAt
FROM MedicalRecord
WHERE petId = $1
ORDER BY createdAt DESC, id DESC;
"#;

pub const QUERY_GET_PET_LATEST_MEDICAL_RECORD: &str = r#"
SELECT
    id,petId,lastVisitDate,weight,healthStatus,
    diseases,treatments,vaccinations,allergies,specialCare,
    sterilized,createdAt
FROM MedicalRecord
WHERE petId = $1
ORDER BY createdAt DESC, id DESC
LIMIT 1;
"#;

pub const QUERY_GET_MEDICAL_RECORD_BY_ID: &str = r#"
SELECT
    id,petId,lastVisitDate,weight,healthStatus,
    diseases,treatments,vaccinations,allergies,specialCare,
    sterilized,createdAt
FROM MedicalRecord
WHERE id = $1;
"#;

pub const QUERY_DELETE_MEDICAL_RECORD: &str = r#"DELETE FROM MedicalRecord WHERE id=$1;"#;

pub const QUERY_GET_PET_BY_ID: &str = r#"
SELECT id,responsibleId FROM Pets WHERE id = $1;
"#;
