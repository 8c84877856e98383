use super::QUESTION_COUNT;

pub struct Question {
    pub text: &'static str,
    /// Malay translation shown under the English text.
    pub translation: &'static str,
    /// Which answers count as 0 and which as 1.
    pub scale: &'static str,
}

const ALWAYS_USUALLY: &str = "0 = Always/Usually , 1 = Sometimes/Rarely/Never";
const TIMES_A_DAY: &str =
    "0 = Many times a day/A few times a day , 1 = A few times a week/Less than once a week/Never";

pub const QUESTIONS: [Question; QUESTION_COUNT] = [
    Question {
        text: "Does your child look at you when you call his/her name?",
        translation: "Adakah anak anda memandang kepada anda apabila anda memanggil nama mereka?",
        scale: ALWAYS_USUALLY,
    },
    Question {
        text: "How easy is it for you to get eye contact with your child?",
        translation: "Sejauh mana mudah bagi anda untuk mendapatkan hubungan mata dengan anak anda?",
        scale: "0 = Very easy/Quite easy , 1 = Quite difficult/Very difficult/Impossible",
    },
    Question {
        text: "Does your child point to indicate that s/he wants something? (e.g. a toy that is out of reach)",
        translation: "Adakah anak anda menunjuk untuk menunjukkan bahawa mereka mahu sesuatu? (contohnya mainan yang berada di luar jangkauan)",
        scale: TIMES_A_DAY,
    },
    Question {
        text: "Does your child point to share interest with you? (e.g. pointing at an interesting sight)",
        translation: "Adakah anak anda menunjuk untuk berkongsi minat dengan anda? (contohnya menunjuk kepada pemandangan yang menarik)",
        scale: TIMES_A_DAY,
    },
    Question {
        text: "Does your child pretend? (e.g. care for dolls, talk on a toy phone)",
        translation: "Adakah anak anda berpura-pura? (contohnya menjaga anak patung, bercakap menggunakan telefon mainan)",
        scale: TIMES_A_DAY,
    },
    Question {
        text: "Does your child follow where you're looking?",
        translation: "Adakah anak anda mengikuti tempat yang anda pandang?",
        scale: TIMES_A_DAY,
    },
    Question {
        text: "If you or someone else in the family is visibly upset, does your child show signs of wanting to comfort them? (e.g. stroking hair, hugging them)",
        translation: "Jika anda atau seseorang dalam keluarga kelihatan tertekan, adakah anak anda menunjukkan tanda-tanda ingin menenangkan mereka? (contohnya, mengusap rambut, memeluk mereka)",
        scale: ALWAYS_USUALLY,
    },
    Question {
        text: "Would you describe your child's first words as:",
        translation: "Adakah anda menggambarkan perkataan pertama anak anda sebagai:",
        scale: "0 = Very typical/Quite typical , 1 = Slightly unusual/Very unusual/My child doesn't speak",
    },
    Question {
        text: "Does your child use simple gestures? (e.g. wave goodbye)",
        translation: "Adakah anak anda menggunakan isyarat mudah? (contohnya melambai selamat tinggal)",
        scale: TIMES_A_DAY,
    },
    // the only reverse-scored item
    Question {
        text: "Does your child stare at nothing with no apparent purpose?",
        translation: "Adakah anak anda merenung ke arah sesuatu tanpa tujuan yang jelas?",
        scale: "0 = Less than once a week/Never , 1 = Many times a day/A few times a day/A few times a week",
    },
];
