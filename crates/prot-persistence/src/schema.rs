// Esquema Diesel das coleções do laboratório. Campos estruturados
// (histórico de produção) são gravados como JSON em colunas de texto;
// timestamps como epoch em milissegundos.
use diesel::allow_tables_to_appear_in_same_query;
diesel::table! {
    patients (id) {
        id -> Text,
        name -> Text,
        clinic -> Text,
        doctor_name -> Text,
        doctor_phone -> Text,
        prosthesis_type -> Text,
        notes -> Text,
        service_value -> Double,
        labor_cost -> Double,
        entry_date_ts -> BigInt,
        due_date_ts -> BigInt,
        payment_status -> Text,
        workflow_history -> Text,
    }
}
diesel::table! {
    expenses (id) {
        id -> Text,
        description -> Text,
        amount -> Double,
        date_ts -> BigInt,
        category -> Text,
    }
}
diesel::table! {
    clinics (id) {
        id -> Text,
        name -> Text,
        doctor_name -> Text,
        phone -> Nullable<Text>,
    }
}
diesel::table! {
    service_items (id) {
        id -> Text,
        name -> Text,
        price -> Double,
    }
}
allow_tables_to_appear_in_same_query!(patients, expenses, clinics, service_items);
