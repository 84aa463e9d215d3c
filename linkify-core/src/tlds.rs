//! # Listas de Domínios de Topo (TLDs)
//!
//! Subconjunto da lista da IANA: todos os domínios de código de país e os
//! genéricos mais comuns, além de TLDs internacionalizados (IDN) em escrita nativa.
//! As listas estão em ordem alfabética; o construtor de cadeias compartilha prefixos
//! entre elas (ex: `co`, `com`, `community`).

/// TLDs ASCII.
pub const TLDS: &[&str] = &[
    "aaa", "abb", "abc", "ac", "academy", "accountant", "accountants", "actor", "ad", "adult",
    "ae", "aero", "af", "ag", "agency", "ai", "airforce", "al", "am", "amazon",
    "ao", "apartments", "app", "apple", "aq", "ar", "archi", "army", "arpa", "art",
    "as", "asia", "associates", "at", "attorney", "au", "auction", "audio", "auto", "autos",
    "aw", "ax", "az", "ba", "baby", "band", "bank", "bar", "barcelona", "bargains",
    "baseball", "basketball", "bb", "bd", "be", "beauty", "beer", "berlin", "best", "bet",
    "bf", "bg", "bh", "bi", "bible", "bid", "bike", "bingo", "bio", "biz",
    "bj", "black", "blackfriday", "blog", "blue", "bm", "bn", "bo", "boats", "bond",
    "boo", "book", "boston", "boutique", "box", "br", "broker", "brussels", "bs", "bt",
    "build", "builders", "business", "buzz", "bv", "bw", "by", "bz", "ca", "cab",
    "cafe", "cam", "camera", "camp", "capital", "car", "cards", "care", "career", "careers",
    "cars", "casa", "cash", "casino", "cat", "catering", "cc", "cd", "center", "ceo",
    "cf", "cg", "ch", "charity", "chat", "cheap", "church", "ci", "city", "ck",
    "cl", "claims", "cleaning", "click", "clinic", "clothing", "cloud", "club", "cm", "cn",
    "co", "coach", "codes", "coffee", "college", "com", "community", "company", "computer", "condos",
    "construction", "consulting", "contractors", "cooking", "cool", "coop", "country", "coupons", "courses", "cr",
    "credit", "creditcard", "cricket", "cruises", "cu", "cv", "cw", "cx", "cy", "cz",
    "dance", "data", "date", "dating", "day", "de", "deals", "degree", "delivery", "democrat",
    "dental", "dentist", "design", "dev", "diamonds", "diet", "digital", "direct", "directory", "discount",
    "dj", "dk", "dm", "do", "doctor", "dog", "domains", "download", "dz", "earth",
    "ec", "eco", "edu", "education", "ee", "eg", "email", "energy", "engineer", "engineering",
    "enterprises", "equipment", "er", "es", "estate", "et", "eu", "events", "exchange", "expert",
    "exposed", "express", "fail", "faith", "family", "fan", "fans", "farm", "fashion", "fi",
    "film", "finance", "financial", "fish", "fitness", "fj", "fk", "flights", "florist", "flowers",
    "fm", "fo", "football", "forsale", "foundation", "fr", "free", "fun", "fund", "furniture",
    "futbol", "fyi", "ga", "gallery", "game", "games", "garden", "gay", "gb", "gd",
    "ge", "gf", "gg", "gh", "gi", "gift", "gifts", "gives", "gl", "glass",
    "global", "gm", "gmbh", "gn", "gold", "golf", "google", "gov", "gp", "gq",
    "gr", "graphics", "gratis", "green", "gripe", "group", "gs", "gt", "gu", "guide",
    "guitars", "guru", "gw", "gy", "hair", "health", "healthcare", "help", "hiphop", "hk",
    "hm", "hn", "hockey", "holdings", "holiday", "homes", "horse", "hospital", "host", "hosting",
    "house", "how", "hr", "ht", "hu", "id", "ie", "il", "im", "immo",
    "in", "inc", "industries", "info", "ink", "institute", "insure", "int", "international", "investments",
    "io", "iq", "ir", "irish", "is", "it", "je", "jetzt", "jewelry", "jm",
    "jo", "jobs", "jp", "juegos", "kaufen", "ke", "kg", "kh", "ki", "kim",
    "kitchen", "km", "kn", "kp", "kr", "kw", "ky", "kz", "la", "land",
    "lat", "law", "lawyer", "lb", "lc", "lease", "legal", "lgbt", "li", "life",
    "lighting", "limited", "limo", "link", "live", "lk", "llc", "loan", "loans", "lol",
    "london", "love", "lr", "ls", "lt", "ltd", "lu", "luxury", "lv", "ly",
    "ma", "maison", "management", "market", "marketing", "mba", "mc", "md", "me", "media",
    "memorial", "men", "menu", "mg", "mh", "mil", "mk", "ml", "mm", "mn",
    "mo", "mobi", "moda", "moe", "money", "mortgage", "mov", "movie", "mp", "mq",
    "mr", "ms", "mt", "mu", "museum", "music", "mv", "mw", "mx", "my",
    "mz", "na", "name", "navy", "nc", "ne", "net", "network", "news", "nf",
    "ng", "ni", "ninja", "nl", "no", "np", "nr", "nu", "nyc", "nz",
    "observer", "office", "om", "one", "onl", "online", "ooo", "org", "organic", "pa",
    "page", "paris", "partners", "parts", "party", "pe", "pet", "pf", "pg", "ph",
    "photo", "photography", "photos", "pics", "pictures", "pink", "pizza", "pk", "pl", "place",
    "plumbing", "plus", "pm", "pn", "poker", "porn", "pr", "press", "pro", "productions",
    "properties", "property", "ps", "pt", "pub", "pw", "py", "qa", "quest", "radio",
    "re", "realestate", "recipes", "red", "rehab", "reise", "reisen", "rent", "rentals", "repair",
    "report", "republican", "rest", "restaurant", "review", "reviews", "rich", "rip", "ro", "rocks",
    "rs", "ru", "run", "rw", "sa", "sale", "salon", "sarl", "sb", "sc",
    "school", "schule", "science", "sd", "se", "security", "services", "sex", "sexy", "sg",
    "sh", "shoes", "shop", "shopping", "show", "si", "singles", "site", "sj", "sk",
    "ski", "sl", "sm", "sn", "so", "soccer", "social", "software", "solar", "solutions",
    "space", "sport", "sr", "ss", "st", "store", "stream", "studio", "study", "style",
    "su", "sucks", "supplies", "supply", "support", "surf", "surgery", "sv", "sx", "sy",
    "systems", "sz", "tattoo", "tax", "taxi", "tc", "td", "team", "tech", "technology",
    "tel", "tennis", "tf", "tg", "th", "theater", "tickets", "tips", "tires", "tj",
    "tk", "tl", "tm", "tn", "to", "today", "tools", "top", "tours", "town",
    "toys", "tr", "trade", "trading", "training", "travel", "tt", "tube", "tv", "tw",
    "tz", "ua", "ug", "uk", "university", "uno", "us", "uy", "uz", "va",
    "vacations", "vc", "ve", "vegas", "ventures", "vet", "vg", "vi", "viajes", "video",
    "villas", "vin", "vip", "vision", "vn", "vodka", "vote", "voting", "voyage", "vu",
    "wang", "watch", "webcam", "website", "wedding", "wf", "wiki", "win", "wine", "work",
    "works", "world", "ws", "wtf", "xxx", "xyz", "ye", "yoga", "yt", "za",
    "zm", "zone", "zw",
];

/// TLDs Unicode (IDN) em escrita nativa.
pub const UTLDS: &[&str] = &[
    "ελ", "бг", "бел", "дети", "ею", "католик",
    "ком", "мкд", "мон", "москва", "онлайн", "орг",
    "рус", "рф", "сайт", "срб", "укр", "қаз",
    "հայ", "קום", "ابوظبي", "ارامكو", "الاردن", "البحرين",
    "الجزائر", "السعودية", "المغرب", "امارات", "ایران", "بازار",
    "بھارت", "تونس", "سودان", "شبكة", "عمان", "فلسطين",
    "قطر", "كوم", "مصر", "موقع", "भारत", "संगठन",
    "বাংলা", "ভারত", "ਭਾਰਤ", "ભારત", "இந்தியா", "இலங்கை",
    "சிங்கப்பூர்", "భారత్", "ලංකා", "ไทย", "გე", "みんな",
    "コム", "ストア", "セール", "世界", "中信", "中国",
    "中國", "中文网", "企业", "佛山", "公司", "公益",
    "台湾", "台灣", "商城", "商标", "在线", "大拿",
    "娱乐", "广东", "我爱你", "手机", "政务", "新加坡",
    "时尚", "机构", "游戏", "澳門", "移动", "网址",
    "网络", "香港", "닷넷", "닷컴", "삼성", "한국",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tlds_are_sorted_and_unique() {
        for pair in TLDS.windows(2) {
            assert!(pair[0] < pair[1], "fora de ordem: {} >= {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_tlds_are_lowercase_ascii() {
        assert!(TLDS
            .iter()
            .all(|t| t.chars().all(|c| c.is_ascii_lowercase())));
        assert!(UTLDS.iter().all(|t| !t.is_ascii()));
    }

    #[test]
    fn test_common_entries_present() {
        for tld in ["com", "co", "br", "org", "io", "dev"] {
            assert!(TLDS.contains(&tld), "faltando {}", tld);
        }
    }
}
