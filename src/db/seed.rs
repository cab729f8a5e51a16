use sqlx::SqlitePool;

use super::{now_timestamp, personnel::create_personnel, salon, Result};
use crate::models::{Owner, PersonnelInput, Salon, SocialMedia, WorkingDay};

const WEEK_TR: [&str; 7] = [
    "Pazartesi",
    "Salı",
    "Çarşamba",
    "Perşembe",
    "Cuma",
    "Cumartesi",
    "Pazar",
];

/// Creates the salon and its staff on an empty database. Does nothing if the salon exists.
pub async fn seed_defaults(pool: &SqlitePool, salon_id: &str) -> Result<()> {
    if salon::get_salon(pool, salon_id).await?.is_some() {
        log::debug!("Salon {salon_id} already seeded");
        return Ok(());
    }

    salon::insert_salon(pool, &default_salon(salon_id)).await?;
    for person in default_personnel() {
        create_personnel(pool, salon_id, &person).await?;
    }

    log::info!("Seeded salon {salon_id}");
    Ok(())
}

fn default_salon(salon_id: &str) -> Salon {
    Salon {
        id: salon_id.to_string(),
        name: "TASARIMHANE".to_string(),
        kind: "Bay/Bayan Güzellik Salonu".to_string(),
        owner: Owner {
            name: "Mesut".to_string(),
            surname: "AKÇAKOCA".to_string(),
            phone: "+905551234567".to_string(),
            email: None,
            role: "Salon Sahibi".to_string(),
        },
        founded_year: "2014".to_string(),
        staff_count: "4 Kişi".to_string(),
        phone: "+90 555 123 4567".to_string(),
        whatsapp: "+90 555 123 4567".to_string(),
        address: "Atatürk Caddesi No: 25, Merkez/Düzce".to_string(),
        about: "TASARIMHANE olarak 2014 yılından bu yana müşterilerimize en kaliteli hizmeti \
                sunmak için çalışıyoruz."
            .to_string(),
        working_hours: WEEK_TR
            .iter()
            .map(|day| WorkingDay {
                day: day.to_string(),
                hours: "10:00 - 22:00".to_string(),
                is_open: true,
            })
            .collect(),
        social_media: SocialMedia {
            facebook: Some("https://facebook.com/tasarimhane".to_string()),
            instagram: Some("https://instagram.com/tasarimhane".to_string()),
            twitter: Some("https://twitter.com/tasarimhane".to_string()),
            tiktok: Some("https://tiktok.com/@tasarimhane".to_string()),
        },
        images: (1..=6)
            .map(|n| format!("https://picsum.photos/seed/salon{n}/800/400"))
            .collect(),
        created_at: now_timestamp(),
        updated_at: None,
    }
}

fn staff(
    name: &str,
    surname: &str,
    phone: &str,
    image_seed: Option<&str>,
    services: &[&str],
    working_hours: &str,
    day_off: &str,
    about: &str,
) -> PersonnelInput {
    PersonnelInput {
        name: name.to_string(),
        surname: surname.to_string(),
        phone: Some(phone.to_string()),
        role: "Kadın/Erkek Kuaförü".to_string(),
        image: image_seed.map(|seed| format!("https://picsum.photos/seed/{seed}/200/200")),
        services: services.iter().map(|s| s.to_string()).collect(),
        working_hours: working_hours.to_string(),
        day_off: day_off.to_string(),
        about: about.to_string(),
    }
}

fn default_personnel() -> Vec<PersonnelInput> {
    vec![
        staff(
            "Fatma Gül",
            "Özkaya",
            "+905551000001",
            Some("fatma"),
            &[
                "Saç Bakımı",
                "Saç Yıkama+Fön",
                "Saç Düzleştirme",
                "Saç Boyama",
                "Ağda(Tüm Vücut)",
                "Cilt Bakımı",
            ],
            "12:00 - 21:00",
            "Çarşamba",
            "Merhaba,\nBen Fatma Gül . TASARIMHANE salonunda yukarıda listelenen hizmetleri veriyorum. Çarşamba günleri hariç haftanın 6 günü 12:00-21:00 saatleri arasında seni de salonumuza bekliyoruz.",
        ),
        staff(
            "İbrahim",
            "AKÇAKOCA",
            "+905551000002",
            Some("ibrahim"),
            &["Saç Kesimi", "Sakal Tıraşı", "Saç Boyama", "Saç Şekillendirme"],
            "10:00 - 22:00",
            "Pazartesi",
            "Merhaba,\nBen İbrahim. TASARIMHANE salonunda yukarıda listelenen hizmetleri veriyorum.",
        ),
        staff(
            "İsmet",
            "Yiğit",
            "+905551000003",
            Some("ismet"),
            &["Saç Kesimi", "Saç Boyama", "Saç Bakımı"],
            "10:00 - 22:00",
            "Salı",
            "Merhaba,\nBen İsmet. TASARIMHANE salonunda yukarıda listelenen hizmetleri veriyorum.",
        ),
        // Shares the owner's phone; owner login wins.
        staff(
            "Mesut",
            "AKÇAKOCA",
            "+905551234567",
            Some("mesut"),
            &["Saç Kesimi", "Sakal Tıraşı", "Saç Şekillendirme", "Saç Boyama"],
            "10:00 - 22:00",
            "Pazar",
            "Merhaba,\nBen Mesut. TASARIMHANE salonunun sahibi ve kuaförüyüm.",
        ),
        staff(
            "Osman Baki",
            "Akçakoca",
            "+905551000005",
            Some("osman"),
            &["Saç Kesimi", "Saç Boyama"],
            "10:00 - 22:00",
            "Çarşamba",
            "Merhaba,\nBen Osman Baki. TASARIMHANE salonunda hizmet veriyorum.",
        ),
        staff(
            "Şevket",
            "Demirkaya",
            "+905551000006",
            None,
            &["Saç Kesimi", "Sakal Tıraşı"],
            "10:00 - 22:00",
            "Perşembe",
            "Merhaba,\nBen Şevket. TASARIMHANE salonunda hizmet veriyorum.",
        ),
        // The salon's own bookable account.
        staff(
            "TASARIMHANE",
            ".",
            "+905551000007",
            Some("tasarimhane"),
            &["Tüm Hizmetler"],
            "10:00 - 22:00",
            "Yok",
            "TASARIMHANE salon hesabı.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{personnel::list_personnel, test_pool};

    #[actix_web::test]
    async fn seeding_twice_is_a_no_op() {
        let pool = test_pool().await;
        seed_defaults(&pool, "tasarimhane").await.unwrap();
        seed_defaults(&pool, "tasarimhane").await.unwrap();

        let staff = list_personnel(&pool, "tasarimhane").await.unwrap();
        assert_eq!(staff.len(), 7);
        assert_eq!(staff[0].name, "Fatma Gül");
        let account = staff.iter().find(|p| p.phone == "+905551000007").unwrap();
        assert_eq!(account.services, vec!["Tüm Hizmetler"]);
        assert_eq!(account.day_off, "Yok");
        let ismet = staff.iter().find(|p| p.name == "İsmet").unwrap();
        assert!(ismet.about.starts_with("Merhaba,\nBen İsmet."));
        let salon = salon::get_salon(&pool, "tasarimhane").await.unwrap().unwrap();
        assert_eq!(salon.images.len(), 6);
        assert_eq!(salon.working_hours[0].day, "Pazartesi");
    }
}
