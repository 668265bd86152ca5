mod common;

use common::{kk, status, RecordingRest};
use kepayang_admin::api::{Attachment, RequestBody};
use kepayang_admin::resources::{
    Admin, Berita, JumlahKk, Komentar, Penduduk, PendudukScreen, Rtrw, Sambutan, StrukturDesa,
};
use kepayang_admin::sync::{RequestOutcome, ResourceListController, ResourceScreen, SyncError};
use reqwest::Method;
use serde_json::json;
use std::time::Duration;
use tokio::time::timeout;

#[tokio::test]
async fn fetch_replaces_list_with_backend_order() {
    let rest = RecordingRest::with_responses(vec![Ok(json!([kk(2, 40), kk(1, 12)]))]);
    let mut list = ResourceListController::<JumlahKk>::new(rest.shared());
    assert!(list.is_loading());

    let items = list.fetch_all().await.unwrap();
    assert_eq!(items.iter().map(|k| k.id).collect::<Vec<_>>(), vec![2, 1]);
    assert_eq!(list.outcome(), &RequestOutcome::Success);

    let calls = rest.calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].path, "jumlahkk/");
    assert!(!calls[0].auth);
}

#[tokio::test]
async fn failed_fetch_keeps_previous_list() {
    let rest = RecordingRest::with_responses(vec![
        Ok(json!({ "data": [kk(1, 12)] })),
        Err(status(500, None)),
    ]);
    let mut list = ResourceListController::<JumlahKk>::new(rest.shared());
    list.fetch_all().await.unwrap();

    let err = list.fetch_all().await.unwrap_err();
    assert_eq!(err, SyncError::Fetch("Gagal mengambil data".into()));
    assert_eq!(list.items().len(), 1);
    assert_eq!(list.error(), Some("Gagal mengambil data"));
    assert_eq!(list.fetch_count(), 2);
}

#[tokio::test]
async fn create_sends_sanitized_count_then_refetches() {
    let rest = RecordingRest::with_responses(vec![
        Ok(json!([kk(1, 12)])),
        Ok(json!({ "message": "created" })),
        Ok(json!([kk(1, 12), kk(2, 123)])),
    ]);
    let mut screen = ResourceScreen::<JumlahKk>::new(rest.shared());
    screen.mount().await.unwrap();

    screen.open_create();
    assert_eq!(screen.update_field("jumlahkk", "12a3"), Some("123"));
    screen.submit().await.unwrap();

    assert_eq!(
        rest.trace().await,
        vec!["GET jumlahkk/", "POST jumlahkk/", "GET jumlahkk/"]
    );
    let calls = rest.calls().await;
    assert_eq!(
        calls[1].body,
        Some(RequestBody::Json(json!({ "jumlahkk": 123 })))
    );
    assert!(!screen.form.is_open());
    assert!(screen.list.find(&2).is_some());
    assert_eq!(screen.banner(), None);
}

#[tokio::test]
async fn invalid_form_sends_nothing() {
    let rest = RecordingRest::with_responses(vec![Ok(json!([]))]);
    let mut screen = ResourceScreen::<JumlahKk>::new(rest.shared());
    screen.mount().await.unwrap();

    screen.open_create();
    let err = screen.submit().await.unwrap_err();
    assert!(matches!(err, SyncError::Validation(_)));
    assert_eq!(screen.banner(), Some("Jumlah KK harus berupa angka"));
    assert!(screen.form.is_open());
    assert_eq!(rest.trace().await, vec!["GET jumlahkk/"]);
}

#[tokio::test]
async fn tags_are_stripped_while_typing() {
    let mut screen = ResourceScreen::<Berita>::new(RecordingRest::default().shared());
    screen.open_create();
    assert_eq!(screen.update_field("judul", "<b>Tom</b>"), Some("bTom/b"));
    assert_eq!(screen.form.draft().get("judul"), "bTom/b");
}

#[tokio::test]
async fn save_failure_keeps_draft_and_prefers_server_message() {
    let rest = RecordingRest::with_responses(vec![
        Ok(json!([kk(1, 12)])),
        Err(status(409, Some("Data sudah ada"))),
        Err(status(500, None)),
    ]);
    let mut screen = ResourceScreen::<JumlahKk>::new(rest.shared());
    screen.mount().await.unwrap();
    screen.open_edit(&1).unwrap();
    screen.update_field("jumlahkk", "15");

    let err = screen.submit().await.unwrap_err();
    assert_eq!(err, SyncError::Save("Data sudah ada".into()));
    assert!(screen.form.is_open());
    assert_eq!(screen.form.draft().get("jumlahkk"), "15");

    let err = screen.submit().await.unwrap_err();
    assert_eq!(err, SyncError::Save("Gagal menyimpan data".into()));
    assert_eq!(
        rest.trace().await,
        vec!["GET jumlahkk/", "PUT jumlahkk/1", "PUT jumlahkk/1"]
    );
}

#[tokio::test]
async fn delete_issues_one_request_then_refetches() {
    let rest = RecordingRest::with_responses(vec![
        Ok(json!([kk(1, 12), kk(2, 40)])),
        Ok(json!({ "message": "deleted" })),
        Ok(json!([kk(2, 40)])),
    ]);
    let mut screen = ResourceScreen::<JumlahKk>::new(rest.shared());
    screen.mount().await.unwrap();

    assert!(screen.request_delete(&1));
    assert_eq!(
        screen.deletion.pending().map(|p| p.display_name.as_str()),
        Some("12 KK")
    );
    screen.confirm_delete().await.unwrap();
    // A second confirm has nothing pending.
    screen.confirm_delete().await.unwrap();

    assert_eq!(
        rest.trace().await,
        vec!["GET jumlahkk/", "DELETE jumlahkk/1", "GET jumlahkk/"]
    );
    assert!(screen.list.find(&1).is_none());
    assert!(!screen.deletion.is_open());
}

#[tokio::test]
async fn failed_delete_still_clears_pending() {
    let rest = RecordingRest::with_responses(vec![
        Ok(json!([kk(1, 12)])),
        Err(status(500, Some("constraint"))),
    ]);
    let mut screen = ResourceScreen::<JumlahKk>::new(rest.shared());
    screen.mount().await.unwrap();

    screen.request_delete(&1);
    let err = screen.confirm_delete().await.unwrap_err();
    assert_eq!(err, SyncError::Delete("Gagal menghapus data".into()));
    assert!(screen.deletion.pending().is_none());
    assert_eq!(screen.list.items().len(), 1);
    assert_eq!(rest.trace().await, vec!["GET jumlahkk/", "DELETE jumlahkk/1"]);
}

#[tokio::test]
async fn cancelled_delete_sends_nothing() {
    let rest = RecordingRest::with_responses(vec![Ok(json!([kk(1, 12)]))]);
    let mut screen = ResourceScreen::<JumlahKk>::new(rest.shared());
    screen.mount().await.unwrap();

    assert!(!screen.request_delete(&99));
    screen.request_delete(&1);
    screen.cancel_delete();
    screen.confirm_delete().await.unwrap();
    assert_eq!(rest.trace().await, vec!["GET jumlahkk/"]);
}

#[tokio::test]
async fn admin_edit_never_prefills_password() {
    let rest = RecordingRest::with_responses(vec![
        Ok(json!([{ "id_admin": 3, "username": "rina", "role": "admin" }])),
        Ok(json!({})),
    ]);
    let mut screen = ResourceScreen::<Admin>::new(rest.shared());
    screen.mount().await.unwrap();
    screen.open_edit(&3).unwrap();

    assert_eq!(screen.form.draft().get("username"), "rina");
    assert_eq!(screen.form.draft().get("password"), "");

    screen.submit().await.unwrap();
    let calls = rest.calls().await;
    assert!(calls[0].auth);
    assert_eq!(calls[1].method, Method::PUT);
    assert_eq!(calls[1].path, "admin/3");
    assert_eq!(
        calls[1].body,
        Some(RequestBody::Json(json!({ "username": "rina" })))
    );
}

#[tokio::test]
async fn admin_create_goes_to_register() {
    let rest = RecordingRest::with_responses(vec![Ok(json!([])), Ok(json!({}))]);
    let mut screen = ResourceScreen::<Admin>::new(rest.shared());
    screen.mount().await.unwrap();
    screen.open_create();
    screen.update_field("username", "budi");
    screen.update_field("password", "rahasia");
    screen.submit().await.unwrap();
    assert_eq!(rest.trace().await[1], "POST admin/register");
}

#[tokio::test]
async fn sambutan_update_is_multipart_patch() {
    let rest = RecordingRest::with_responses(vec![
        Ok(json!([{ "ID": 1, "Foto": "uploads/a.jpg", "KataSambutan": "Halo", "NamaKepalaDesa": "Pak Harun" }])),
        Ok(json!({})),
    ]);
    let mut screen = ResourceScreen::<Sambutan>::new(rest.shared());
    screen.mount().await.unwrap();
    screen.open_edit(&1).unwrap();
    screen.update_field("kata_sambutan", "Selamat datang");
    screen
        .form
        .attach(Attachment::from_bytes("kades.png", vec![0x89, 0x50]))
        .unwrap();
    screen.submit().await.unwrap();

    let calls = rest.calls().await;
    assert_eq!(calls[1].method, Method::PATCH);
    assert_eq!(calls[1].path, "sambutan/1");
    let Some(RequestBody::Multipart(body)) = &calls[1].body else {
        panic!("expected multipart body, got {:?}", calls[1].body);
    };
    assert!(body
        .fields
        .contains(&("kata_sambutan".to_string(), "Selamat datang".to_string())));
    let (field, file) = body.file.as_ref().unwrap();
    assert_eq!(field, "foto_kepaladesa");
    assert_eq!(file.content_type, "image/png");
}

#[tokio::test]
async fn resident_screen_loads_options_and_checks_rtrw() {
    let rest = RecordingRest::with_responses(vec![
        Ok(json!([])),
        Ok(json!([{ "id_rtrw": 2, "rt": "01", "rw": "03" }])),
    ]);
    let mut screen = PendudukScreen::new(rest.shared());
    screen.mount().await.unwrap();
    assert_eq!(screen.rtrw_label(2).as_deref(), Some("RT 01 / RW 03"));

    let mut paths = rest.trace().await;
    paths.sort();
    assert_eq!(paths, vec!["GET penduduk/", "GET rtrw/"]);

    screen.residents.open_create();
    for (name, value) in [
        ("id_rtrw", "9"),
        ("nama", "Siti"),
        ("agama", "Islam"),
        ("gender", "Perempuan"),
    ] {
        screen.residents.update_field(name, value);
    }
    let err = screen.submit().await.unwrap_err();
    assert_eq!(err, SyncError::Validation("RT/RW tidak ditemukan".into()));
    assert_eq!(rest.calls().await.len(), 2);

    screen.residents.update_field("id_rtrw", "2");
    screen.submit().await.unwrap();
    let calls = rest.calls().await;
    assert_eq!(calls[2].path, "penduduk/");
    assert_eq!(
        calls[2].body,
        Some(RequestBody::Json(json!({
            "id_rtrw": 2, "nama": "Siti", "agama": "Islam", "gender": "Perempuan"
        })))
    );
    assert!(!screen.residents.form.is_open());
}

#[tokio::test]
async fn unknown_id_cannot_be_edited() {
    let mut screen = ResourceScreen::<Penduduk>::new(RecordingRest::default().shared());
    screen.mount().await.unwrap();
    assert!(screen.open_edit(&4).is_err());
    assert_eq!(screen.banner(), Some("Data 4 tidak ditemukan"));
}

#[tokio::test(start_paused = true)]
async fn abandoned_fetch_does_not_stay_loading() {
    let rest = RecordingRest::default();
    rest.push_delayed(Duration::from_secs(5), Ok(json!([kk(1, 12)])))
        .await;
    let mut list = ResourceListController::<JumlahKk>::new(rest.shared());

    let timed_out = timeout(Duration::from_secs(1), list.fetch_all())
        .await
        .is_err();
    assert!(timed_out);
    assert_eq!(
        list.outcome(),
        &RequestOutcome::Error("Gagal mengambil data".into())
    );
    assert!(!list.is_loading());
}

#[tokio::test(start_paused = true)]
async fn abandoned_refresh_restores_previous_outcome() {
    let rest = RecordingRest::with_responses(vec![Ok(json!([kk(1, 12)]))]);
    rest.push_delayed(Duration::from_secs(5), Ok(json!([])))
        .await;
    let mut list = ResourceListController::<JumlahKk>::new(rest.shared());
    list.fetch_all().await.unwrap();

    assert!(timeout(Duration::from_secs(1), list.fetch_all())
        .await
        .is_err());
    assert_eq!(list.outcome(), &RequestOutcome::Success);
    assert_eq!(list.items().len(), 1);
    assert_eq!(list.fetch_count(), 2);
}

#[tokio::test]
async fn rtrw_fields_keep_three_digits() {
    let mut screen = ResourceScreen::<Rtrw>::new(RecordingRest::default().shared());
    screen.open_create();
    assert_eq!(screen.update_field("rt", "01a234"), Some("012"));
    assert_eq!(screen.update_field("rw", "<9>x"), Some("9"));
}

#[tokio::test]
async fn komentar_name_and_phone_are_filtered() {
    let mut screen = ResourceScreen::<Komentar>::new(RecordingRest::default().shared());
    screen.open_create();
    assert_eq!(
        screen.update_field("nama", "Budi123 Santoso!"),
        Some("Budi Santoso")
    );
    assert_eq!(
        screen
            .update_field("nama", "Abdurrahman Wahid Saputra")
            .map(|v| v.chars().count()),
        Some(20)
    );
    assert_eq!(
        screen.update_field("no_hp", "0812-3456-7890-99"),
        Some("0812345678909")
    );
    assert_eq!(
        screen.update_field("email", "<a>rina@desa.id"),
        Some("arina@desa.id")
    );
}

#[tokio::test]
async fn berita_create_uploads_photo_as_foto() {
    let rest = RecordingRest::with_responses(vec![Ok(json!([])), Ok(json!({}))]);
    let mut screen = ResourceScreen::<Berita>::new(rest.shared());
    screen.mount().await.unwrap();
    screen.open_create();
    screen.update_field("judul", "Panen raya");
    screen.update_field("deskripsi", "Hasil panen melimpah");
    screen.update_field("tanggal", "2024-05-01");
    screen
        .form
        .attach(Attachment::from_bytes("panen.jpg", vec![0xff, 0xd8]))
        .unwrap();
    screen.submit().await.unwrap();

    let calls = rest.calls().await;
    assert_eq!(calls[1].method, Method::POST);
    assert_eq!(calls[1].path, "berita/");
    let Some(RequestBody::Multipart(body)) = &calls[1].body else {
        panic!("expected multipart body, got {:?}", calls[1].body);
    };
    let (field, file) = body.file.as_ref().unwrap();
    assert_eq!(field, "foto");
    assert_eq!(file.file_name, "panen.jpg");
    assert!(body
        .fields
        .contains(&("tanggal".to_string(), "2024-05-01".to_string())));
}

#[tokio::test]
async fn struktur_edit_uploads_photo_as_foto() {
    let rest = RecordingRest::with_responses(vec![
        Ok(json!([{ "IDStruktur": 5, "Foto": "uploads/s.jpg", "Nama": "Rahmat", "Jabatan": "Sekdes" }])),
        Ok(json!({})),
    ]);
    let mut screen = ResourceScreen::<StrukturDesa>::new(rest.shared());
    screen.mount().await.unwrap();
    screen.open_edit(&5).unwrap();
    screen.update_field("jabatan", "Kepala Dusun");
    screen
        .form
        .attach(Attachment::from_bytes("rahmat.png", vec![1]))
        .unwrap();
    screen.submit().await.unwrap();

    let calls = rest.calls().await;
    assert_eq!(calls[1].method, Method::PUT);
    assert_eq!(calls[1].path, "struktur-desa/5");
    let Some(RequestBody::Multipart(body)) = &calls[1].body else {
        panic!("expected multipart body, got {:?}", calls[1].body);
    };
    assert_eq!(body.file.as_ref().map(|(f, _)| f.as_str()), Some("foto"));
    assert!(body
        .fields
        .contains(&("nama".to_string(), "Rahmat".to_string())));
}

#[tokio::test]
async fn saved_write_with_failed_refresh_shows_banner() {
    let rest = RecordingRest::with_responses(vec![
        Ok(json!([kk(1, 12)])),
        Ok(json!({})),
        Err(status(502, None)),
    ]);
    let mut screen = ResourceScreen::<JumlahKk>::new(rest.shared());
    screen.mount().await.unwrap();
    screen.open_create();
    screen.update_field("jumlahkk", "20");

    screen.submit().await.unwrap();
    assert!(!screen.form.is_open());
    assert_eq!(screen.banner(), Some("Gagal mengambil data"));
    assert_eq!(screen.list.items().len(), 1);
    assert_eq!(
        rest.trace().await,
        vec!["GET jumlahkk/", "POST jumlahkk/", "GET jumlahkk/"]
    );
}

#[tokio::test]
async fn confirmed_delete_with_failed_refresh_shows_banner() {
    let rest = RecordingRest::with_responses(vec![
        Ok(json!([kk(1, 12), kk(2, 40)])),
        Ok(json!({})),
        Err(status(500, None)),
    ]);
    let mut screen = ResourceScreen::<JumlahKk>::new(rest.shared());
    screen.mount().await.unwrap();
    screen.request_delete(&2);

    screen.confirm_delete().await.unwrap();
    assert!(screen.deletion.pending().is_none());
    assert_eq!(screen.deletion.error(), None);
    assert_eq!(screen.banner(), Some("Gagal mengambil data"));
    assert_eq!(screen.list.items().len(), 2);
}
